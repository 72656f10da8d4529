pub mod config;
pub mod errors;
pub mod journal;
pub mod kernel;
pub mod traits;
pub mod types;
