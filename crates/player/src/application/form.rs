//! Sheet form model - the editable slots of a character sheet page.
//!
//! The form holds exactly what the user typed. Conversion to and from a
//! [`CharacterRecord`] is where numeric coercion, trimming and the sparse
//! weapon encoding happen.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use sheetkeep_domain::{
    modifier_label, Ability, AbilityScores, CharacterRecord, DomainError, RiteTier, SheetNumber,
    Weapon, WEAPON_ROWS,
};

/// Column of the weapon table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponColumn {
    Name,
    Kind,
    Damage,
    Range,
    Notes,
}

impl WeaponColumn {
    pub const ALL: [WeaponColumn; 5] = [
        Self::Name,
        Self::Kind,
        Self::Damage,
        Self::Range,
        Self::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Kind => "type",
            Self::Damage => "damage",
            Self::Range => "range",
            Self::Notes => "notes",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A named input slot of the sheet page.
///
/// Field ids match the page's element ids (`str`, `save_dex`, `hp_max`,
/// `rites_l3_known`, ...); weapon cells are `weapon_<row>_<column>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetField {
    Name,
    Class,
    Level,
    Player,
    MainStat,
    Ability(Ability),
    Speed,
    Passive,
    Save(Ability),
    ArmorType,
    Shield,
    Ac,
    HpMax,
    HpCurrent,
    HpTemp,
    ClassTraits,
    BackgroundTags,
    CommonActivities,
    RiteUses(RiteTier),
    RiteKnown(RiteTier),
    Weapon { row: usize, column: WeaponColumn },
    Equipment,
    Notes,
    Stats,
}

impl SheetField {
    /// Every editable field in page order.
    pub fn all() -> Vec<SheetField> {
        let mut fields = vec![
            Self::Name,
            Self::Class,
            Self::Level,
            Self::Player,
            Self::MainStat,
        ];
        fields.extend(Ability::ALL.into_iter().map(Self::Ability));
        fields.extend([Self::Speed, Self::Passive]);
        fields.extend(Ability::ALL.into_iter().map(Self::Save));
        fields.extend([
            Self::ArmorType,
            Self::Shield,
            Self::Ac,
            Self::HpMax,
            Self::HpCurrent,
            Self::HpTemp,
            Self::ClassTraits,
            Self::BackgroundTags,
            Self::CommonActivities,
        ]);
        fields.extend(RiteTier::ALL.into_iter().map(Self::RiteUses));
        fields.extend(RiteTier::ALL.into_iter().map(Self::RiteKnown));
        for row in 0..WEAPON_ROWS {
            fields.extend(
                WeaponColumn::ALL
                    .into_iter()
                    .map(|column| Self::Weapon { row, column }),
            );
        }
        fields.extend([Self::Equipment, Self::Notes, Self::Stats]);
        fields
    }
}

impl fmt::Display for SheetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Class => f.write_str("class"),
            Self::Level => f.write_str("level"),
            Self::Player => f.write_str("player"),
            Self::MainStat => f.write_str("main_stat"),
            Self::Ability(a) => f.write_str(a.field_id()),
            Self::Speed => f.write_str("speed"),
            Self::Passive => f.write_str("passive"),
            Self::Save(a) => write!(f, "save_{}", a.field_id()),
            Self::ArmorType => f.write_str("armor_type"),
            Self::Shield => f.write_str("shield"),
            Self::Ac => f.write_str("ac"),
            Self::HpMax => f.write_str("hp_max"),
            Self::HpCurrent => f.write_str("hp_current"),
            Self::HpTemp => f.write_str("hp_temp"),
            Self::ClassTraits => f.write_str("class_traits"),
            Self::BackgroundTags => f.write_str("background_tags"),
            Self::CommonActivities => f.write_str("common_activities"),
            Self::RiteUses(t) => write!(f, "rites_{}_uses", t.as_str()),
            Self::RiteKnown(t) => write!(f, "rites_{}_known", t.as_str()),
            Self::Weapon { row, column } => write!(f, "weapon_{}_{}", row, column.as_str()),
            Self::Equipment => f.write_str("equipment"),
            Self::Notes => f.write_str("notes"),
            Self::Stats => f.write_str("stats"),
        }
    }
}

impl FromStr for SheetField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();

        if let Some(rest) = id.strip_prefix("weapon_") {
            return rest
                .split_once('_')
                .and_then(|(row, column)| {
                    let row: usize = row.parse().ok()?;
                    let column = WeaponColumn::parse(column)?;
                    (row < WEAPON_ROWS).then_some(Self::Weapon { row, column })
                })
                .ok_or_else(|| DomainError::unknown_field(id));
        }

        Self::all()
            .into_iter()
            .find(|field| field.to_string() == id)
            .ok_or_else(|| DomainError::unknown_field(id))
    }
}

/// One row of the weapon table as typed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeaponRow {
    pub name: String,
    pub kind: String,
    pub damage: String,
    pub range: String,
    pub notes: String,
}

impl WeaponRow {
    fn cell(&self, column: WeaponColumn) -> &String {
        match column {
            WeaponColumn::Name => &self.name,
            WeaponColumn::Kind => &self.kind,
            WeaponColumn::Damage => &self.damage,
            WeaponColumn::Range => &self.range,
            WeaponColumn::Notes => &self.notes,
        }
    }

    fn cell_mut(&mut self, column: WeaponColumn) -> &mut String {
        match column {
            WeaponColumn::Name => &mut self.name,
            WeaponColumn::Kind => &mut self.kind,
            WeaponColumn::Damage => &mut self.damage,
            WeaponColumn::Range => &mut self.range,
            WeaponColumn::Notes => &mut self.notes,
        }
    }
}

impl From<&Weapon> for WeaponRow {
    fn from(w: &Weapon) -> Self {
        Self {
            name: w.name.clone(),
            kind: w.kind.clone(),
            damage: w.damage.clone(),
            range: w.range.clone(),
            notes: w.notes.clone(),
        }
    }
}

impl From<&WeaponRow> for Weapon {
    fn from(row: &WeaponRow) -> Self {
        Self {
            name: row.name.clone(),
            kind: row.kind.clone(),
            damage: row.damage.clone(),
            range: row.range.clone(),
            notes: row.notes.clone(),
        }
    }
}

/// The in-memory form model of a sheet page.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetForm {
    pub name: String,
    pub class: String,
    pub level: String,
    pub player: String,
    pub main_stat: String,
    pub ability: AbilityScores<String>,
    pub speed: String,
    pub passive: String,
    pub saves: AbilityScores<String>,
    pub armor_type: String,
    pub shield: bool,
    pub ac: String,
    pub hp_max: String,
    pub hp_current: String,
    pub hp_temp: String,
    pub class_traits: String,
    pub background_tags: String,
    pub common_activities: String,
    pub rite_uses: [String; 3],
    pub rite_known: [String; 3],
    pub weapons: [WeaponRow; WEAPON_ROWS],
    pub equipment: String,
    pub notes: String,
    /// Extended stats as JSON text
    pub stats: String,
}

impl Default for SheetForm {
    /// The page's initial state: the level box shows 1, everything else
    /// is empty.
    fn default() -> Self {
        Self::from_record(&CharacterRecord::default())
    }
}

fn tier_index(tier: RiteTier) -> usize {
    match tier {
        RiteTier::L1 => 0,
        RiteTier::L3 => 1,
        RiteTier::L6 => 2,
    }
}

fn parse_checkbox(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes" | "checked" | "x"
    )
}

fn number(input: &str) -> SheetNumber {
    SheetNumber::coerce(input, SheetNumber::Blank)
}

impl SheetForm {
    /// Populates every slot from a decoded record.
    ///
    /// The weapon table always has [`WEAPON_ROWS`] rows; stored rows beyond
    /// that are not shown.
    pub fn from_record(record: &CharacterRecord) -> Self {
        let mut weapons: [WeaponRow; WEAPON_ROWS] = Default::default();
        for (slot, weapon) in weapons.iter_mut().zip(&record.weapons) {
            *slot = WeaponRow::from(weapon);
        }

        let stats = record
            .stats
            .as_ref()
            .and_then(|map| serde_json::to_string_pretty(map).ok())
            .unwrap_or_default();

        Self {
            name: record.name.clone(),
            class: record.class.clone(),
            level: record.level.to_string(),
            player: record.player.clone(),
            main_stat: record.main_stat.clone(),
            ability: record.ability.map(ToString::to_string),
            speed: record.speed.to_string(),
            passive: record.passive_perception.to_string(),
            saves: record.saves.map(ToString::to_string),
            armor_type: record.armor.kind.clone(),
            shield: record.armor.shield,
            ac: record.ac.to_string(),
            hp_max: record.hp.max.to_string(),
            hp_current: record.hp.current.to_string(),
            hp_temp: record.hp.temp.to_string(),
            class_traits: record.class_traits.clone(),
            background_tags: record.background_tags.clone(),
            common_activities: record.common_activities.clone(),
            rite_uses: RiteTier::ALL.map(|t| record.rites.uses(t).to_string()),
            rite_known: RiteTier::ALL.map(|t| record.rites.known(t).to_string()),
            weapons,
            equipment: record.equipment.clone(),
            notes: record.notes.clone(),
            stats,
        }
    }

    /// Serializes the form into a record.
    ///
    /// Numeric slots fall back per field (`level` to 1, the rest to blank).
    /// All-blank weapon rows are dropped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Parse` when the stats text is not a JSON object;
    /// the message is the parser's own.
    pub fn to_record(&self) -> Result<CharacterRecord, DomainError> {
        let stats = parse_stats(&self.stats)?;

        let mut record = CharacterRecord {
            name: self.name.trim().to_string(),
            class: self.class.trim().to_string(),
            level: SheetNumber::coerce(&self.level, SheetNumber::from(1)),
            player: self.player.trim().to_string(),
            main_stat: self.main_stat.clone(),
            ability: self.ability.map(|s| number(s)),
            speed: number(&self.speed),
            passive_perception: number(&self.passive),
            class_traits: self.class_traits.clone(),
            background_tags: self.background_tags.clone(),
            common_activities: self.common_activities.clone(),
            saves: self.saves.map(|s| number(s)),
            ac: number(&self.ac),
            weapons: self.weapons.iter().map(Weapon::from).collect(),
            equipment: self.equipment.clone(),
            notes: self.notes.clone(),
            stats,
            ..CharacterRecord::default()
        };
        record.armor.kind = self.armor_type.clone();
        record.armor.shield = self.shield;
        record.hp.max = number(&self.hp_max);
        record.hp.current = number(&self.hp_current);
        record.hp.temp = number(&self.hp_temp);
        for tier in RiteTier::ALL {
            *record.rites.uses_mut(tier) = number(&self.rite_uses[tier_index(tier)]);
            *record.rites.known_mut(tier) = self.rite_known[tier_index(tier)].clone();
        }
        record.compact_weapons();

        Ok(record)
    }

    /// Current text of a slot. The shield checkbox reads `true`/`false`.
    pub fn value(&self, field: SheetField) -> String {
        match field {
            SheetField::Shield => self.shield.to_string(),
            other => self.text(other).cloned().unwrap_or_default(),
        }
    }

    /// Writes a slot. Returns true when the field is an ability score, whose
    /// modifier must then be redisplayed.
    pub fn set(&mut self, field: SheetField, value: &str) -> bool {
        if field == SheetField::Shield {
            self.shield = parse_checkbox(value);
            return false;
        }
        if let Some(slot) = self.text_mut(field) {
            *slot = value.to_string();
        }
        matches!(field, SheetField::Ability(_))
    }

    /// Display modifiers for the six scores; empty for non-numeric scores.
    pub fn modifiers(&self) -> AbilityScores<String> {
        self.ability.map(|score| {
            SheetNumber::parse(score)
                .map(|n| modifier_label(&n))
                .unwrap_or_default()
        })
    }

    fn text(&self, field: SheetField) -> Option<&String> {
        Some(match field {
            SheetField::Name => &self.name,
            SheetField::Class => &self.class,
            SheetField::Level => &self.level,
            SheetField::Player => &self.player,
            SheetField::MainStat => &self.main_stat,
            SheetField::Ability(a) => self.ability.get(a),
            SheetField::Speed => &self.speed,
            SheetField::Passive => &self.passive,
            SheetField::Save(a) => self.saves.get(a),
            SheetField::ArmorType => &self.armor_type,
            SheetField::Shield => return None,
            SheetField::Ac => &self.ac,
            SheetField::HpMax => &self.hp_max,
            SheetField::HpCurrent => &self.hp_current,
            SheetField::HpTemp => &self.hp_temp,
            SheetField::ClassTraits => &self.class_traits,
            SheetField::BackgroundTags => &self.background_tags,
            SheetField::CommonActivities => &self.common_activities,
            SheetField::RiteUses(t) => &self.rite_uses[tier_index(t)],
            SheetField::RiteKnown(t) => &self.rite_known[tier_index(t)],
            SheetField::Weapon { row, column } => self.weapons.get(row)?.cell(column),
            SheetField::Equipment => &self.equipment,
            SheetField::Notes => &self.notes,
            SheetField::Stats => &self.stats,
        })
    }

    fn text_mut(&mut self, field: SheetField) -> Option<&mut String> {
        Some(match field {
            SheetField::Name => &mut self.name,
            SheetField::Class => &mut self.class,
            SheetField::Level => &mut self.level,
            SheetField::Player => &mut self.player,
            SheetField::MainStat => &mut self.main_stat,
            SheetField::Ability(a) => self.ability.get_mut(a),
            SheetField::Speed => &mut self.speed,
            SheetField::Passive => &mut self.passive,
            SheetField::Save(a) => self.saves.get_mut(a),
            SheetField::ArmorType => &mut self.armor_type,
            SheetField::Shield => return None,
            SheetField::Ac => &mut self.ac,
            SheetField::HpMax => &mut self.hp_max,
            SheetField::HpCurrent => &mut self.hp_current,
            SheetField::HpTemp => &mut self.hp_temp,
            SheetField::ClassTraits => &mut self.class_traits,
            SheetField::BackgroundTags => &mut self.background_tags,
            SheetField::CommonActivities => &mut self.common_activities,
            SheetField::RiteUses(t) => &mut self.rite_uses[tier_index(t)],
            SheetField::RiteKnown(t) => &mut self.rite_known[tier_index(t)],
            SheetField::Weapon { row, column } => self.weapons.get_mut(row)?.cell_mut(column),
            SheetField::Equipment => &mut self.equipment,
            SheetField::Notes => &mut self.notes,
            SheetField::Stats => &mut self.stats,
        })
    }
}

fn parse_stats(text: &str) -> Result<Option<serde_json::Map<String, Value>>, DomainError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Err(DomainError::parse(
            "stats",
            "extended stats must be a JSON object",
        )),
        Err(e) => Err(DomainError::parse("stats", e.to_string())),
    }
}
