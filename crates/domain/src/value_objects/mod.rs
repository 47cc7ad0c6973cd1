//! Value objects - Immutable objects defined by their attributes

mod ability;
mod sheet_number;
mod slug;

pub use ability::{
    ability_modifier, format_modifier, modifier_label, score_modifier, Ability, AbilityScores,
};
pub use sheet_number::SheetNumber;
pub use slug::{slug_from_page, Slug};
