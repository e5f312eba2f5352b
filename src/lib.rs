//! Rugloom server
//!
//! E-commerce backend for a custom-carpet shop. Products carry per-color
//! image variants; edits to them flow through the catalog reconciler, which
//! merges submitted state against persisted state and schedules best-effort
//! deletions at the external asset store for images that fell out of use.
//!
//! # Modules
//!
//! - [`core`] - configuration, shared state, HTTP server
//! - [`api`] - route handlers
//! - [`catalog`] - product service and the color variant reconciler
//! - [`assets`] - asset store client (HTTP and in-memory)
//! - [`auth`] - OTP login, JWT issuance, extractors
//! - [`db`] - embedded SurrealDB, models and repositories
//! - [`utils`] - errors, response envelope, logging, validation

pub mod api;
pub mod assets;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};
