//! Core library components.
//!
//! This module contains the reusable logic for per-key versioned secrets on
//! top of whole-blob versioning backends.

#[cfg(feature = "aws")]
pub mod aws;
pub mod blob;
pub mod codec;
pub mod config;
pub mod constants;
pub mod domain;
pub mod identity;
pub mod store;
pub mod types;
pub mod validation;
