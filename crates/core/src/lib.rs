//! Recipe Box Core - Shared types library.
//!
//! This crate provides the value types used across the Recipe Box components:
//! - `web` - Server-rendered recipe site
//! - `cli` - Command-line tools for migrations and account seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. The optional `postgres` feature adds `sqlx` encode/decode
//! support so the types can be bound directly in queries.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
