//! Builder Service - the local builder/sheet flow.
//!
//! The builder form writes one record under a fixed key; the sheet view reads
//! it back and fills display slots, substituting fallbacks for blank values.

use std::sync::Arc;

use sheetkeep_domain::common::{join_non_empty, or_fallback};
use sheetkeep_shared::{BuilderCombat, BuilderRecord, BuilderStats};

use crate::ports::outbound::{storage_keys, KeyValueStore, StoreError};

/// Fallback for any blank display slot without its own text.
pub const BLANK_SLOT: &str = "—";

#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("Could not save character to this browser.")]
    Storage(#[source] StoreError),
}

/// The overview card of the sheet view.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewCard {
    pub name: String,
    pub player: String,
    pub class: String,
    pub subclass: String,
    pub race: String,
    pub background: String,
    pub alignment: String,
    pub level: String,
}

/// Display text for every slot of the builder's sheet page.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderSheetView {
    pub char_name: String,
    pub name_class: String,
    pub player: String,
    pub race_background: String,
    pub alignment_level: String,
    pub portrait_url: Option<String>,
    pub overview: OverviewCard,
    pub stats: BuilderStats,
    pub combat: BuilderCombat,
    pub features: String,
    pub spell_slots: String,
    pub spells: String,
    pub weapons: String,
    pub armor: String,
    pub items: String,
    pub coins: String,
    pub backstory: String,
}

fn slot(value: &str) -> String {
    or_fallback(value, BLANK_SLOT).to_string()
}

impl BuilderSheetView {
    pub fn from_record(data: &BuilderRecord) -> Self {
        let hero_name = or_fallback(&data.name, "Unnamed Hero");
        let hero_class = or_fallback(&data.class, "Classless Wanderer");
        let hero_level = if data.level.is_empty() {
            String::new()
        } else {
            format!("Level {}", data.level)
        };

        let name_class = if hero_level.is_empty() {
            format!("{} · {}", hero_name, hero_class)
        } else {
            format!("{} · {} ({})", hero_name, hero_class, hero_level)
        };
        let player = if data.player_name.is_empty() {
            String::new()
        } else {
            format!("Player: {}", data.player_name)
        };

        let coins = [
            (data.coins.gp.as_str(), "gp"),
            (data.coins.sp.as_str(), "sp"),
            (data.coins.cp.as_str(), "cp"),
        ]
        .into_iter()
        .filter(|(amount, _)| !amount.is_empty())
        .map(|(amount, unit)| format!("{} {}", amount, unit))
        .collect::<Vec<_>>()
        .join(" · ");

        let s = &data.stats;
        let c = &data.combat;

        Self {
            char_name: format!("{} – Character Sheet", hero_name),
            name_class,
            player: slot(&player),
            race_background: slot(&join_non_empty(
                [data.race.as_str(), data.background.as_str()],
                " · ",
            )),
            alignment_level: slot(&join_non_empty(
                [data.alignment.as_str(), hero_level.as_str()],
                " · ",
            )),
            portrait_url: (!data.portrait_url.is_empty()).then(|| data.portrait_url.clone()),
            overview: OverviewCard {
                name: hero_name.to_string(),
                player: slot(&data.player_name),
                class: hero_class.to_string(),
                subclass: slot(&data.subclass),
                race: slot(&data.race),
                background: slot(&data.background),
                alignment: slot(&data.alignment),
                level: slot(&data.level),
            },
            stats: BuilderStats {
                str: slot(&s.str),
                dex: slot(&s.dex),
                con: slot(&s.con),
                int: slot(&s.int),
                wis: slot(&s.wis),
                cha: slot(&s.cha),
            },
            combat: BuilderCombat {
                hp: slot(&c.hp),
                ac: slot(&c.ac),
                init: slot(&c.init),
                speed: slot(&c.speed),
                prof_bonus: slot(&c.prof_bonus),
                passive_perc: slot(&c.passive_perc),
            },
            features: or_fallback(&data.features, "No features listed.").to_string(),
            spell_slots: slot(&data.spell_slots),
            spells: or_fallback(&data.spells, "No spells listed.").to_string(),
            weapons: or_fallback(&data.weapons, "No weapons listed.").to_string(),
            armor: or_fallback(&data.armor, "No armor listed.").to_string(),
            items: or_fallback(&data.items, "No items listed.").to_string(),
            coins: or_fallback(&coins, "No coins recorded.").to_string(),
            backstory: or_fallback(&data.backstory, "No backstory provided.").to_string(),
        }
    }
}

#[derive(Clone)]
pub struct BuilderService {
    storage: Arc<dyn KeyValueStore>,
}

impl BuilderService {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Trims and stores the builder form, replacing any previous character.
    pub fn submit(&self, form: BuilderRecord) -> Result<BuilderRecord, BuilderError> {
        let record = form.trimmed();
        let raw = serde_json::to_string(&record)
            .map_err(|e| BuilderError::Storage(StoreError::from(e)))?;

        self.storage
            .save(storage_keys::BUILDER_CHARACTER, &raw)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to save character");
                BuilderError::Storage(e)
            })?;

        tracing::info!(name = %record.name, "Builder character saved");
        Ok(record)
    }

    /// The stored builder record; `None` when absent or unreadable.
    pub fn load(&self) -> Option<BuilderRecord> {
        let raw = match self.storage.load(storage_keys::BUILDER_CHARACTER) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::error!(error = %e, "Error loading character");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!(error = %e, "Error loading character");
                None
            }
        }
    }

    /// The sheet view, or `None` for the empty state.
    pub fn load_sheet(&self) -> Option<BuilderSheetView> {
        self.load().map(|record| BuilderSheetView::from_record(&record))
    }
}
