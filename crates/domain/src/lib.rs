extern crate self as sheetkeep_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod value_objects;

pub use entities::{Armor, CharacterRecord, HitPoints, RiteTier, Rites, Weapon, WEAPON_ROWS};

pub use error::DomainError;

pub use value_objects::{
    ability_modifier, format_modifier, modifier_label, score_modifier, slug_from_page, Ability,
    AbilityScores, SheetNumber, Slug,
};
