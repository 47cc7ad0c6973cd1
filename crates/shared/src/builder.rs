//! Builder record - the character data written by the builder form.
//!
//! Stored as a single JSON document in the local key/value store. Every
//! value is kept as the text the user typed, trimmed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderRecord {
    pub name: String,
    pub player_name: String,
    pub class: String,
    pub subclass: String,
    pub race: String,
    pub background: String,
    pub alignment: String,
    pub level: String,
    pub portrait_url: String,
    pub stats: BuilderStats,
    pub combat: BuilderCombat,
    pub features: String,
    pub spell_slots: String,
    pub spells: String,
    pub weapons: String,
    pub armor: String,
    pub items: String,
    pub coins: BuilderCoins,
    pub backstory: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderStats {
    pub str: String,
    pub dex: String,
    pub con: String,
    pub int: String,
    pub wis: String,
    pub cha: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderCombat {
    pub hp: String,
    pub ac: String,
    pub init: String,
    pub speed: String,
    pub prof_bonus: String,
    pub passive_perc: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderCoins {
    pub gp: String,
    pub sp: String,
    pub cp: String,
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

impl BuilderRecord {
    /// Returns the record with every text field trimmed.
    ///
    /// The portrait URL is a generated value and is kept verbatim.
    pub fn trimmed(mut self) -> Self {
        for field in [
            &mut self.name,
            &mut self.player_name,
            &mut self.class,
            &mut self.subclass,
            &mut self.race,
            &mut self.background,
            &mut self.alignment,
            &mut self.level,
            &mut self.features,
            &mut self.spell_slots,
            &mut self.spells,
            &mut self.weapons,
            &mut self.armor,
            &mut self.items,
            &mut self.backstory,
            &mut self.stats.str,
            &mut self.stats.dex,
            &mut self.stats.con,
            &mut self.stats.int,
            &mut self.stats.wis,
            &mut self.stats.cha,
            &mut self.combat.hp,
            &mut self.combat.ac,
            &mut self.combat.init,
            &mut self.combat.speed,
            &mut self.combat.prof_bonus,
            &mut self.combat.passive_perc,
            &mut self.coins.gp,
            &mut self.coins.sp,
            &mut self.coins.cp,
        ] {
            trim_in_place(field);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_page_keys() {
        let record = BuilderRecord {
            player_name: "Sam".into(),
            spell_slots: "2/2".into(),
            portrait_url: "https://img/1".into(),
            combat: BuilderCombat {
                prof_bonus: "+2".into(),
                passive_perc: "12".into(),
                ..BuilderCombat::default()
            },
            ..BuilderRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["playerName"], json!("Sam"));
        assert_eq!(json["spellSlots"], json!("2/2"));
        assert_eq!(json["portraitUrl"], json!("https://img/1"));
        assert_eq!(json["combat"]["profBonus"], json!("+2"));
        assert_eq!(json["combat"]["passivePerc"], json!("12"));
        assert_eq!(json["coins"]["gp"], json!(""));
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let record: BuilderRecord =
            serde_json::from_value(json!({ "name": "Ayla", "stats": { "str": "15" } })).unwrap();
        assert_eq!(record.name, "Ayla");
        assert_eq!(record.stats.str, "15");
        assert_eq!(record.coins, BuilderCoins::default());
    }

    #[test]
    fn trimmed_strips_whitespace() {
        let record = BuilderRecord {
            name: "  Ayla ".into(),
            coins: BuilderCoins {
                gp: " 12\n".into(),
                ..BuilderCoins::default()
            },
            ..BuilderRecord::default()
        }
        .trimmed();
        assert_eq!(record.name, "Ayla");
        assert_eq!(record.coins.gp, "12");
    }
}
