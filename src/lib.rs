pub mod algorithm;
pub mod common;
pub mod error;
pub mod report;
pub mod sequence;
pub mod tools;
pub mod utils;
