pub mod genetic_code;
pub mod progress;
