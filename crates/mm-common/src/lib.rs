//! Micromouse host tools: shared types and errors.
//!
//! This crate provides the pieces shared between the capture utility and the
//! offline consumers of its output files:
//! - Common error types with stable numeric codes
//! - The telemetry log format: sentinel prefixes, field counts, file naming

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use schema::{FW_META_PREFIX, LOG_FILE_PREFIX, MM_COLUMNS_PREFIX, TELEMETRY_FIELD_COUNT};
