//! Integration tests for protmap
//!
//! - `transeq/` - six-frame translation and its scheduler
//! - `protalign/` - window mapping, caching and the full pipeline
//!
//! External tools are replaced by the in-process fakes in `helpers`.

pub mod helpers;
pub mod protalign;
pub mod transeq;
