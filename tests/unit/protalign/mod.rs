//! Unit tests for protalign modules

pub mod args;
pub mod cache;
