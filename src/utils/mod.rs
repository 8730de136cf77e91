//! # Utility Modules
//!
//! - **Constants** (`constant`) - Application-wide configuration constants
//! - **Secrets** (`secret`) - Secret lookup from files or environment variables

pub mod constant;
pub mod secret;
