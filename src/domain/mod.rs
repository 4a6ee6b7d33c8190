//! Domain model for symindex
//!
//! This module contains the core record types and errors that provide:
//! - Owned, copy-on-extraction symbol and object records
//! - A shared half-open address-range abstraction
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use errors::IndexError;
pub use types::{AddressRange, Object, Symbol};
