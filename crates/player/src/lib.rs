//! SheetKeep Player crate.
//!
//! Sheet sessions with debounced autosave, the local builder flow, storage
//! adapters and the terminal front end.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod runner;
pub mod ui;

pub use application::services::{
    BuilderService, SheetCommand, SheetEvent, SheetRunner, SheetSession, SheetStatus,
};
pub use application::{AutosaveState, SheetField, SheetForm};
