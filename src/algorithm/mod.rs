pub mod protalign;
pub mod transeq;
