//! Application services: catalog reads and user favorites.

pub mod catalog;
pub mod error;
pub mod favorites;
pub mod pagination;
pub mod repos;
