//! # API Shared
//!
//! Shared utilities and definitions for the medication APIs.
//!
//! Contains:
//! - Wire types for requests and responses that are not core domain types (`dto` module)
//! - Shared services like `HealthService`
//! - API key checking
//!
//! Used by `api-rest`; kept separate so other front ends can reuse the same shapes.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
