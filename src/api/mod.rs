//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`otp`] - email-code authentication
//! - [`products`] - product catalog (reads public, writes admin)
//! - [`taxonomy`] - categories, patterns, shapes, colors, pile heights
//! - [`upload`] - image upload to the asset store
//! - [`carts`] - per-user cart
//! - [`wishlists`] - per-user wishlist
//! - [`addresses`] - per-user delivery addresses

pub mod addresses;
pub mod carts;
pub mod health;
pub mod otp;
pub mod products;
pub mod taxonomy;
pub mod upload;
pub mod wishlists;
