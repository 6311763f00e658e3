//! REST access to the hosted database.

pub mod client;
pub mod types;

// Re-export main types
pub use client::RestClient;
pub use types::{RawRows, RecordQuery};
