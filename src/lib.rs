//! Manka: manga catalog backend.
//!
//! Catalog reads go through a cache-aside layer in front of PostgreSQL; user
//! favorites are toggled directly against the store.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
