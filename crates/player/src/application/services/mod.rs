//! Application services
//!
//! Services depend on port traits, not concrete infrastructure
//! implementations.

pub mod builder_service;
pub mod sheet_runner;
pub mod sheet_session;

pub use builder_service::{BuilderError, BuilderService, BuilderSheetView, OverviewCard};
pub use sheet_runner::{SheetCommand, SheetEvent, SheetRunner};
pub use sheet_session::{
    LoadOutcome, PendingWrite, SheetSession, SheetStatus, WriteOutcome, EXAMPLE_PAGE,
};
