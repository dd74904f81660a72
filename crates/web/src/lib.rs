//! Recipe Box web library.
//!
//! This crate provides the site as a library, allowing it to be tested and
//! reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod password;
pub mod renderer;
pub mod routes;
pub mod state;

pub use routes::app;
