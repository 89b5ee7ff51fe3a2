pub mod common;
pub mod config;
pub mod indexing;
pub mod logging;
pub mod retrieval;
pub mod types;
pub mod vector;

pub use self::config::RetrievalConfig;
