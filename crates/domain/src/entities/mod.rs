//! Domain entities

mod character_record;

pub use character_record::{
    Armor, CharacterRecord, HitPoints, RiteTier, Rites, Weapon, WEAPON_ROWS,
};
