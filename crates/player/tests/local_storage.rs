//! Sheet sessions and the builder flow over file-backed local storage.

use std::sync::Arc;

use serde_json::json;
use sheetkeep_domain::{slug_from_page, SheetNumber};
use sheetkeep_player::application::SaveError;
use sheetkeep_player::infrastructure::storage::{FileKeyValueStore, KeyValueRecordStore};
use sheetkeep_player::infrastructure::SystemClock;
use sheetkeep_player::ports::outbound::{KeyValueStore, RecordStore};
use sheetkeep_player::{BuilderService, SheetField, SheetSession};
use sheetkeep_shared::{BuilderRecord, CharacterRow};

fn open(path: &std::path::Path) -> (Arc<FileKeyValueStore>, Arc<dyn RecordStore>) {
    let kv = Arc::new(FileKeyValueStore::with_path(path));
    let records: Arc<dyn RecordStore> = Arc::new(KeyValueRecordStore::new(kv.clone()));
    (kv, records)
}

fn seed(kv: &FileKeyValueStore, slug: &str, data: serde_json::Value) {
    let row = CharacterRow {
        slug: slug.to_string(),
        data_json: data,
        updated_at: None,
    };
    let raw = serde_json::to_string(&row).expect("row serializes");
    kv.save(&format!("character:{}", slug), &raw)
        .expect("seed row");
}

#[tokio::test]
async fn saved_sheet_reloads_from_a_fresh_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let (kv, records) = open(&path);
    seed(&kv, "troy", json!({ "name": "Troy", "inventory": ["Rope", { "name": "Torch" }] }));

    let mut session = SheetSession::new(
        slug_from_page("character.html?troy&v=3"),
        records,
        Arc::new(SystemClock::new()),
    );
    session.load().await;
    assert_eq!(session.form().equipment, "Rope\nTorch");

    for (field, value) in [
        ("level", "5"),
        ("dex", "14"),
        ("shield", "true"),
        ("weapon_2_name", "Sling"),
        ("rites_l3_known", "Hush"),
        ("stats", r#"{"luck": 3}"#),
    ] {
        session.edit(field.parse::<SheetField>().unwrap(), value);
    }
    assert!(session.save().await.unwrap());
    let saved = session.form().to_record().unwrap();

    let (_, reopened) = open(&path);
    let mut again = SheetSession::new(
        slug_from_page("?troy"),
        reopened,
        Arc::new(SystemClock::new()),
    );
    again.load().await;
    assert!(again.is_ready());
    assert!(again.updated_at().is_some());

    let reloaded = again.form().to_record().unwrap();
    assert_eq!(reloaded, saved);
    assert_eq!(reloaded.level, SheetNumber::from(5));
    assert_eq!(reloaded.weapons.len(), 1);
    assert_eq!(reloaded.weapons[0].name, "Sling");
    assert_eq!(again.modifiers().dex, "+2");
}

#[tokio::test]
async fn new_local_sheet_is_created_saved_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let (_, records) = open(&path);

    let mut plain = SheetSession::new(
        slug_from_page("?newbie"),
        records.clone(),
        Arc::new(SystemClock::new()),
    );
    plain.load().await;
    assert!(!plain.is_ready());

    let mut session = SheetSession::new(
        slug_from_page("?newbie"),
        records,
        Arc::new(SystemClock::new()),
    );
    session.create().await.unwrap();
    assert!(session.is_ready());
    session.edit(SheetField::Name, "Newbie");
    assert!(session.save().await.unwrap());

    let (_, reopened) = open(&path);
    let mut again = SheetSession::new(
        slug_from_page("?newbie"),
        reopened,
        Arc::new(SystemClock::new()),
    );
    again.load().await;
    assert!(again.is_ready());
    assert_eq!(again.form().name, "Newbie");
    assert_eq!(again.form().level, "1");
}

#[tokio::test]
async fn malformed_stats_leave_the_stored_row_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let (kv, records) = open(&dir.path().join("storage.json"));
    seed(&kv, "troy", json!({ "name": "Troy" }));
    let before = kv.load("character:troy").unwrap();

    let mut session = SheetSession::new(
        slug_from_page("?troy"),
        records,
        Arc::new(SystemClock::new()),
    );
    session.load().await;
    session.edit(SheetField::Name, "Changed");
    session.edit(SheetField::Stats, "{\"luck\": }");

    let err = session.save().await.unwrap_err();
    assert!(matches!(err, SaveError::InvalidInput { .. }));
    assert!(!err.input_message().unwrap_or_default().is_empty());
    assert_eq!(kv.load("character:troy").unwrap(), before);
}

#[test]
fn builder_record_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let service = BuilderService::new(Arc::new(FileKeyValueStore::with_path(&path)));
    service
        .submit(BuilderRecord {
            name: " Ayla ".into(),
            class: "Ranger".into(),
            level: "2".into(),
            ..BuilderRecord::default()
        })
        .unwrap();

    let reopened = BuilderService::new(Arc::new(FileKeyValueStore::with_path(&path)));
    let view = reopened.load_sheet().unwrap();
    assert_eq!(view.name_class, "Ayla · Ranger (Level 2)");
    assert_eq!(view.backstory, "No backstory provided.");
}

#[test]
fn failed_builder_save_is_not_shown() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let service = BuilderService::new(Arc::new(FileKeyValueStore::with_path(
        blocker.join("storage.json"),
    )));
    let err = service
        .submit(BuilderRecord {
            name: "X".into(),
            ..BuilderRecord::default()
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Could not save character to this browser.");
    assert!(service.load_sheet().is_none());
}
