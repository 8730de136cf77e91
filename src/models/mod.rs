mod profile;
mod state;
mod user;

pub use profile::{Profile, ProfileFields};
pub use state::AppState;
pub use user::{AccountStatus, BackgroundStatus, User, UserRole};
