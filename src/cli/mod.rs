//! Command-line interface for the symindex binary

pub mod args;

pub use args::Args;
