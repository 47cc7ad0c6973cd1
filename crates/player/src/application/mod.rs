//! Application layer - Use cases and orchestration

pub mod autosave;
pub mod error;
pub mod form;
pub mod services;

pub use autosave::{AfterSave, AutosaveState, SaveDecision, DEFAULT_AUTOSAVE_DELAY};
pub use error::SaveError;
pub use form::{SheetField, SheetForm, WeaponColumn, WeaponRow};
