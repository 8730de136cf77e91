//! # HTTP Request Handlers
//!
//! This module contains all HTTP request handlers for the nannyhub backend.
//!
//! ## Available Handlers
//!
//! - **Admin** (`admin`) - Profile approval, suspension and background overrides
//! - **Signup** (`auth`) - Account registration and access token issuing
//! - **Health Check** (`health_check`) - Application health monitoring
//! - **Profile** (`profile`) - Own account, profile editing and access checks
//! - **Webhooks** (`webhooks`) - Payment and background-check callbacks

pub mod admin;
mod auth;
mod health_check;
mod profile;
mod webhooks;

pub use admin::admin_router;
pub use auth::*;
pub use health_check::*;
pub use profile::*;
pub use webhooks::*;
