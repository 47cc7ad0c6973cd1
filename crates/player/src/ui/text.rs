//! Plain-text rendering of sheet pages for the terminal.

use chrono::{DateTime, Local, Utc};
use sheetkeep_domain::{Ability, RiteTier, WEAPON_ROWS};

use crate::application::form::{SheetField, WeaponColumn};
use crate::application::services::{BuilderSheetView, SheetSession};

/// Placeholder for "never saved".
const NEVER: &str = "—";

pub fn last_saved_label(updated_at: Option<DateTime<Utc>>) -> String {
    match updated_at {
        Some(at) => at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => NEVER.to_string(),
    }
}

fn row(lines: &mut Vec<String>, field: SheetField, value: &str) {
    if value.contains('\n') {
        lines.push(format!("  {}:", field));
        lines.extend(value.lines().map(|l| format!("    {}", l)));
    } else {
        lines.push(format!("  {} = {}", field, value));
    }
}

/// Renders the hosted sheet: header lines, then every field by id.
pub fn render_sheet(session: &SheetSession) -> String {
    let mut lines = vec![
        session.key_line(),
        format!("Status: {}", session.status()),
    ];
    if !session.is_ready() {
        return lines.join("\n");
    }
    lines.push(format!("Last saved: {}", last_saved_label(session.updated_at())));

    let form = session.form();
    let modifiers = session.modifiers();

    lines.push(String::new());
    lines.push("[identity]".into());
    for field in [
        SheetField::Name,
        SheetField::Class,
        SheetField::Level,
        SheetField::Player,
        SheetField::MainStat,
    ] {
        row(&mut lines, field, &form.value(field));
    }

    lines.push("[abilities]".into());
    for ability in Ability::ALL {
        let field = SheetField::Ability(ability);
        let modifier = modifiers.get(ability);
        let value = form.value(field);
        if modifier.is_empty() {
            row(&mut lines, field, &value);
        } else {
            row(&mut lines, field, &format!("{} ({})", value, modifier));
        }
    }

    lines.push("[saves]".into());
    for ability in Ability::ALL {
        row(&mut lines, SheetField::Save(ability), &form.value(SheetField::Save(ability)));
    }

    lines.push("[combat]".into());
    for field in [
        SheetField::Speed,
        SheetField::Passive,
        SheetField::ArmorType,
        SheetField::Shield,
        SheetField::Ac,
        SheetField::HpMax,
        SheetField::HpCurrent,
        SheetField::HpTemp,
    ] {
        row(&mut lines, field, &form.value(field));
    }

    lines.push("[weapons]".into());
    for index in 0..WEAPON_ROWS {
        let cells: Vec<String> = WeaponColumn::ALL
            .into_iter()
            .map(|column| form.value(SheetField::Weapon { row: index, column }))
            .collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        lines.push(format!("  {}: {}", index, cells.join(" | ")));
    }

    lines.push("[rites]".into());
    for tier in RiteTier::ALL {
        row(&mut lines, SheetField::RiteUses(tier), &form.value(SheetField::RiteUses(tier)));
        row(&mut lines, SheetField::RiteKnown(tier), &form.value(SheetField::RiteKnown(tier)));
    }

    lines.push("[notes]".into());
    for field in [
        SheetField::ClassTraits,
        SheetField::BackgroundTags,
        SheetField::CommonActivities,
        SheetField::Equipment,
        SheetField::Notes,
        SheetField::Stats,
    ] {
        row(&mut lines, field, &form.value(field));
    }

    lines.join("\n")
}

/// Renders the builder's sheet page.
pub fn render_builder_sheet(view: &BuilderSheetView) -> String {
    let s = &view.stats;
    let c = &view.combat;
    let o = &view.overview;

    let mut lines = vec![
        view.char_name.clone(),
        view.name_class.clone(),
        view.player.clone(),
        view.race_background.clone(),
        view.alignment_level.clone(),
    ];
    if let Some(url) = &view.portrait_url {
        lines.push(format!("Portrait: {}", url));
    }
    lines.extend([
        String::new(),
        format!("Name: {}  Player: {}", o.name, o.player),
        format!("Class: {}  Subclass: {}", o.class, o.subclass),
        format!("Race: {}  Background: {}", o.race, o.background),
        format!("Alignment: {}  Level: {}", o.alignment, o.level),
        String::new(),
        format!(
            "STR {}  DEX {}  CON {}  INT {}  WIS {}  CHA {}",
            s.str, s.dex, s.con, s.int, s.wis, s.cha
        ),
        format!(
            "HP {}  AC {}  Init {}  Speed {}  Prof {}  Passive {}",
            c.hp, c.ac, c.init, c.speed, c.prof_bonus, c.passive_perc
        ),
        String::new(),
        format!("Features: {}", view.features),
        format!("Spell slots: {}", view.spell_slots),
        format!("Spells: {}", view.spells),
        format!("Weapons: {}", view.weapons),
        format!("Armor: {}", view.armor),
        format!("Items: {}", view.items),
        format!("Coins: {}", view.coins),
        format!("Backstory: {}", view.backstory),
    ]);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetkeep_shared::BuilderRecord;

    #[test]
    fn never_saved_shows_a_dash() {
        assert_eq!(last_saved_label(None), "—");
    }

    #[test]
    fn builder_sheet_lists_fallbacks() {
        let view = BuilderSheetView::from_record(&BuilderRecord::default());
        let text = render_builder_sheet(&view);
        assert!(text.starts_with("Unnamed Hero – Character Sheet"));
        assert!(text.contains("Coins: No coins recorded."));
        assert!(!text.contains("Portrait:"));
    }
}
