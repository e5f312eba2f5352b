//! Core module
//!
//! Configuration, shared state and the HTTP server.

pub mod config;
pub mod server;
pub mod state;

pub use config::{AssetStoreConfig, Config};
pub use server::{Server, build_router};
pub use state::ServerState;
