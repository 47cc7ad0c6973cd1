//! SheetKeep Shared - wire formats for persisted character data
//!
//! This crate contains the shapes that leave the process:
//! - Rows of the hosted `characters` table
//! - The builder record kept in the local key/value store
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization

pub mod builder;
pub mod rows;

pub use builder::{BuilderCoins, BuilderCombat, BuilderRecord, BuilderStats};
pub use rows::{CharacterRow, CharacterRowUpdate};
