//! # Business Logic Services
//!
//! This module contains the core business logic services for the nannyhub
//! backend. Services encapsulate domain-specific functionality and provide
//! clean interfaces for use by HTTP handlers.
//!
//! ## Available Services
//!
//! - **Gate** (`gate`) - Account activation and service-access gating
//! - **JWT** (`jwt`) - Access token creation and validation

pub mod gate;
pub mod jwt;

pub use gate::AccountGate;
