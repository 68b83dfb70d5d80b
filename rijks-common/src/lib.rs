//! # Rijks Common Library
//!
//! Shared code for the Rijksmuseum uploader workspace:
//! - Error types
//! - TOML bootstrap configuration loading and writing
//! - Append-only status/error log writer

pub mod append_log;
pub mod config;
pub mod error;

pub use append_log::{AppendLog, LogEntry};
pub use error::{Error, Result};
