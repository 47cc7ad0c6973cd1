//! Terminal presentation.

pub mod text;

pub use text::{last_saved_label, render_builder_sheet, render_sheet};
