//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, wiring and the run loop.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`scheduler`] - Tick and token refresh cadence

pub mod bootstrap;
pub mod config;
pub mod scheduler;
