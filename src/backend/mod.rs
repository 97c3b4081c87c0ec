//! Research backend communication

pub mod api;
pub mod types;
