//! Shared utilities

pub mod buffer;
pub mod time;
