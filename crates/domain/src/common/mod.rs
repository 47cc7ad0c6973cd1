//! Common utility functions shared across SheetKeep crates.
//!
//! # Design Principles
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **Minimal dependencies** - chrono, serde and serde_json only

pub mod datetime;
pub mod lenient;
pub mod string;

// Re-export commonly used functions at crate root for convenience
pub use datetime::{format_timestamp, parse_datetime, parse_updated_at};
pub use string::{join_non_empty, none_if_empty, or_fallback};
