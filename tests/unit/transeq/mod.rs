//! Unit tests for transeq modules

pub mod args;
pub mod translation;
