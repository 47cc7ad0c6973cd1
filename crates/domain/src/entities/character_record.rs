//! Character record - the structured contents of one character sheet.
//!
//! This is the canonical schema stored in a row's `data_json` column. Every
//! group is read leniently: stored values of the wrong shape fall back to the
//! defaults below instead of rejecting the row.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::common::lenient;
use crate::value_objects::{AbilityScores, SheetNumber};

/// Number of weapon rows a sheet offers.
pub const WEAPON_ROWS: usize = 4;

/// The full structured representation of one character's sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub class: String,
    #[serde(default = "default_level")]
    pub level: SheetNumber,
    #[serde(default, deserialize_with = "lenient::text")]
    pub player: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub main_stat: String,

    #[serde(default, deserialize_with = "lenient::group")]
    pub ability: AbilityScores<SheetNumber>,

    #[serde(default)]
    pub speed: SheetNumber,
    #[serde(default)]
    pub passive_perception: SheetNumber,

    #[serde(default, deserialize_with = "lenient::text")]
    pub class_traits: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub background_tags: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub common_activities: String,

    #[serde(default, deserialize_with = "lenient::group")]
    pub saves: AbilityScores<SheetNumber>,

    #[serde(default, deserialize_with = "lenient::group")]
    pub armor: Armor,
    #[serde(default)]
    pub ac: SheetNumber,

    #[serde(default, deserialize_with = "lenient::group")]
    pub hp: HitPoints,

    /// Sparse: only rows with at least one non-blank field are stored.
    #[serde(default, deserialize_with = "lenient::list")]
    pub weapons: Vec<Weapon>,

    #[serde(default, deserialize_with = "lenient::group")]
    pub rites: Rites,

    #[serde(default, deserialize_with = "lenient::text")]
    pub equipment: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,

    /// Free-form extended stats object, edited as JSON text.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "stats_block"
    )]
    pub stats: Option<Map<String, Value>>,
}

fn default_level() -> SheetNumber {
    SheetNumber::from(1)
}

impl Default for CharacterRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            class: String::new(),
            level: default_level(),
            player: String::new(),
            main_stat: String::new(),
            ability: AbilityScores::default(),
            speed: SheetNumber::Blank,
            passive_perception: SheetNumber::Blank,
            class_traits: String::new(),
            background_tags: String::new(),
            common_activities: String::new(),
            saves: AbilityScores::default(),
            armor: Armor::default(),
            ac: SheetNumber::Blank,
            hp: HitPoints::default(),
            weapons: Vec::new(),
            rites: Rites::default(),
            equipment: String::new(),
            notes: String::new(),
            stats: None,
        }
    }
}

impl CharacterRecord {
    /// Decodes a stored `data_json` value, merging it over the defaults.
    ///
    /// Anything that is not a JSON object decodes to the default record.
    /// Rows written by the inventory-list sheet variant are migrated: their
    /// `inventory` list becomes the `equipment` text when that is empty.
    pub fn from_stored(data: Value) -> Self {
        let Value::Object(mut fields) = data else {
            return Self::default();
        };
        let inventory = fields.remove("inventory");

        let mut record: Self = serde_json::from_value(Value::Object(fields)).unwrap_or_default();
        if let Some(inventory) = inventory {
            record.migrate_inventory(&inventory);
        }
        record
    }

    fn migrate_inventory(&mut self, inventory: &Value) {
        if !self.equipment.is_empty() {
            return;
        }
        self.equipment = match inventory {
            Value::Array(items) => items
                .iter()
                .map(inventory_line)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            other => lenient::text_from_value(other),
        };
    }

    /// Drops weapon rows whose fields are all blank.
    pub fn compact_weapons(&mut self) {
        self.weapons.retain(|w| !w.is_blank());
    }
}

fn inventory_line(item: &Value) -> String {
    match item {
        Value::Object(fields) => fields
            .get("name")
            .map(lenient::text_from_value)
            .unwrap_or_default(),
        other => lenient::text_from_value(other),
    }
}

/// Accepts an object, or a string holding a JSON object (older pages stored
/// the raw text). Anything else means "no stats block".
fn stats_block<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => Some(map),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    })
}

/// Worn armor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Armor {
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub shield: bool,
}

/// Hit points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HitPoints {
    #[serde(default)]
    pub max: SheetNumber,
    #[serde(default)]
    pub current: SheetNumber,
    #[serde(default)]
    pub temp: SheetNumber,
}

/// One row of the weapon table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Weapon {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub damage: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub range: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
}

impl Weapon {
    /// True when every field is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.kind,
            &self.damage,
            &self.range,
            &self.notes,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// Tiers of the rites table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiteTier {
    L1,
    L3,
    L6,
}

impl RiteTier {
    pub const ALL: [RiteTier; 3] = [Self::L1, Self::L3, Self::L6];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L1 => "l1",
            Self::L3 => "l3",
            Self::L6 => "l6",
        }
    }
}

/// Special-ability use and known counters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rites {
    #[serde(default)]
    pub l1_uses: SheetNumber,
    #[serde(default)]
    pub l3_uses: SheetNumber,
    #[serde(default)]
    pub l6_uses: SheetNumber,
    #[serde(default, deserialize_with = "lenient::text")]
    pub l1_known: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub l3_known: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub l6_known: String,
}

impl Rites {
    pub fn uses(&self, tier: RiteTier) -> &SheetNumber {
        match tier {
            RiteTier::L1 => &self.l1_uses,
            RiteTier::L3 => &self.l3_uses,
            RiteTier::L6 => &self.l6_uses,
        }
    }

    pub fn uses_mut(&mut self, tier: RiteTier) -> &mut SheetNumber {
        match tier {
            RiteTier::L1 => &mut self.l1_uses,
            RiteTier::L3 => &mut self.l3_uses,
            RiteTier::L6 => &mut self.l6_uses,
        }
    }

    pub fn known(&self, tier: RiteTier) -> &str {
        match tier {
            RiteTier::L1 => &self.l1_known,
            RiteTier::L3 => &self.l3_known,
            RiteTier::L6 => &self.l6_known,
        }
    }

    pub fn known_mut(&mut self, tier: RiteTier) -> &mut String {
        match tier {
            RiteTier::L1 => &mut self.l1_known,
            RiteTier::L3 => &mut self.l3_known,
            RiteTier::L6 => &mut self.l6_known,
        }
    }
}
