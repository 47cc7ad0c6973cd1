//! Ability value objects - the six ability scores and their modifiers.
//!
//! Provides type safety for ability references instead of magic strings
//! like "STR", "DEX".

use serde::{Deserialize, Serialize};
use std::fmt;

use super::SheetNumber;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ability {
    /// Strength - physical power
    Str,
    /// Dexterity - agility and reflexes
    Dex,
    /// Constitution - endurance and health
    Con,
    /// Intelligence - reasoning and memory
    Int,
    /// Wisdom - perception and insight
    Wis,
    /// Charisma - force of personality
    Cha,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];

    /// Returns the short uppercase key used in stored records (e.g., "STR").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }

    /// Returns the lowercase form field id (e.g., "str").
    pub fn field_id(&self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Dex => "dex",
            Self::Con => "con",
            Self::Int => "int",
            Self::Wis => "wis",
            Self::Cha => "cha",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One value per ability, keyed `STR`..`CHA` when stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores<T> {
    #[serde(rename = "STR")]
    pub str: T,
    #[serde(rename = "DEX")]
    pub dex: T,
    #[serde(rename = "CON")]
    pub con: T,
    #[serde(rename = "INT")]
    pub int: T,
    #[serde(rename = "WIS")]
    pub wis: T,
    #[serde(rename = "CHA")]
    pub cha: T,
}

impl<T> AbilityScores<T> {
    pub fn get(&self, ability: Ability) -> &T {
        match ability {
            Ability::Str => &self.str,
            Ability::Dex => &self.dex,
            Ability::Con => &self.con,
            Ability::Int => &self.int,
            Ability::Wis => &self.wis,
            Ability::Cha => &self.cha,
        }
    }

    pub fn get_mut(&mut self, ability: Ability) -> &mut T {
        match ability {
            Ability::Str => &mut self.str,
            Ability::Dex => &mut self.dex,
            Ability::Con => &mut self.con,
            Ability::Int => &mut self.int,
            Ability::Wis => &mut self.wis,
            Ability::Cha => &mut self.cha,
        }
    }

    /// Builds a new block by applying `f` to every ability's value.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> AbilityScores<U> {
        AbilityScores {
            str: f(&self.str),
            dex: f(&self.dex),
            con: f(&self.con),
            int: f(&self.int),
            wis: f(&self.wis),
            cha: f(&self.cha),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, &T)> {
        Ability::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}

/// Ability modifier: `floor((score - 10) / 2)`.
pub fn ability_modifier(score: i64) -> i64 {
    // div_euclid floors for a positive divisor; `/` would truncate
    score.saturating_sub(10).div_euclid(2)
}

/// Formats a modifier with an explicit `+` for non-negative values.
pub fn format_modifier(modifier: i64) -> String {
    if modifier >= 0 {
        format!("+{}", modifier)
    } else {
        modifier.to_string()
    }
}

/// Modifier for a stored score, if the score is a number.
pub fn score_modifier(score: &SheetNumber) -> Option<i64> {
    match score.as_i64() {
        Some(whole) => Some(ability_modifier(whole)),
        None => score
            .as_f64()
            .map(|s| ((s - 10.0) / 2.0).floor() as i64),
    }
}

/// Display text for a score's modifier; empty when the score is blank.
pub fn modifier_label(score: &SheetNumber) -> String {
    score_modifier(score).map(format_modifier).unwrap_or_default()
}
