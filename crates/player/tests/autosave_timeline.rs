//! Autosave timing against a recording store, on paused tokio time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};

use sheetkeep_domain::{CharacterRecord, Slug};
use sheetkeep_player::infrastructure::SystemClock;
use sheetkeep_player::ports::outbound::{RecordStore, StoreError, StoredRecord};
use sheetkeep_player::{
    AutosaveState, SheetCommand, SheetEvent, SheetField, SheetRunner, SheetSession, SheetStatus,
};

const DELAY: Duration = Duration::from_millis(1500);

/// Records every write with its start offset; each write takes `latency`.
struct RecordingStore {
    started: Instant,
    latency: Duration,
    writes: Mutex<Vec<(Duration, CharacterRecord)>>,
}

impl RecordingStore {
    fn new(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            started: Instant::now(),
            latency,
            writes: Mutex::new(Vec::new()),
        })
    }

    fn writes(&self) -> Vec<(Duration, CharacterRecord)> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn fetch(&self, _slug: &Slug) -> Result<StoredRecord, StoreError> {
        Ok(StoredRecord {
            data: json!({ "name": "Troy" }),
            updated_at: None,
        })
    }

    async fn upsert(
        &self,
        _slug: &Slug,
        record: &CharacterRecord,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let offset = self.started.elapsed();
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((offset, record.clone()));
        }
        sleep(self.latency).await;
        Ok(())
    }
}

fn spawn_runner(
    store: Arc<RecordingStore>,
) -> (
    mpsc::Sender<SheetCommand>,
    tokio::task::JoinHandle<SheetSession>,
) {
    let session = SheetSession::new(
        Slug::new("troy").ok(),
        store,
        Arc::new(SystemClock::new()),
    );
    let (tx, rx) = mpsc::channel(16);
    let runner = SheetRunner::new(session, AutosaveState::new(DELAY));
    (tx, tokio::spawn(runner.run(rx)))
}

fn last_status(events: &mut mpsc::UnboundedReceiver<SheetEvent>) -> Option<SheetStatus> {
    let mut last = None;
    while let Ok(event) = events.try_recv() {
        if let SheetEvent::Status(status) = event {
            last = Some(status);
        }
    }
    last
}

fn edit(field: SheetField, value: &str) -> SheetCommand {
    SheetCommand::Edit {
        field,
        value: value.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_produce_one_save_after_the_last() {
    let store = RecordingStore::new(Duration::from_millis(10));
    let (tx, task) = spawn_runner(store.clone());

    tx.send(SheetCommand::Load).await.unwrap();
    tx.send(edit(SheetField::Notes, "a")).await.unwrap();
    sleep(Duration::from_millis(500)).await;
    tx.send(edit(SheetField::Notes, "ab")).await.unwrap();
    sleep(Duration::from_millis(500)).await;
    tx.send(edit(SheetField::Notes, "abc")).await.unwrap();

    sleep(Duration::from_millis(1400)).await;
    assert!(store.writes().is_empty(), "saved before the quiet period");

    sleep(Duration::from_millis(1000)).await;
    let writes = store.writes();
    assert_eq!(writes.len(), 1);
    let (at, record) = &writes[0];
    assert!(*at >= Duration::from_millis(2500), "saved at {:?}", at);
    assert!(*at < Duration::from_millis(2600), "saved at {:?}", at);
    assert_eq!(record.notes, "abc");

    drop(tx);
    let session = task.await.unwrap();
    assert_eq!(store.writes().len(), 1);
    assert_eq!(session.status().to_string(), "Saved ✔");
}

#[tokio::test(start_paused = true)]
async fn timer_during_a_save_adds_exactly_one_save() {
    // Writes take longer than the debounce delay.
    let store = RecordingStore::new(Duration::from_millis(4000));
    let (tx, task) = spawn_runner(store.clone());

    tx.send(SheetCommand::Load).await.unwrap();
    tx.send(edit(SheetField::Name, "first")).await.unwrap();

    // First save starts at 1.5s and runs until 5.5s.
    sleep(Duration::from_millis(2000)).await;
    assert_eq!(store.writes().len(), 1);

    // This edit's timer fires at 3.5s while the first save is in flight.
    tx.send(edit(SheetField::Name, "second")).await.unwrap();
    sleep(Duration::from_millis(2000)).await;
    assert_eq!(store.writes().len(), 1);

    // After completion a fresh debounce cycle runs: 5.5s + 1.5s = 7.0s.
    sleep(Duration::from_millis(6000)).await;
    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    assert!(writes[1].0 >= Duration::from_millis(7000));
    assert_eq!(writes[1].1.name, "second");

    sleep(Duration::from_millis(10_000)).await;
    assert_eq!(store.writes().len(), 2);

    drop(tx);
    task.await.unwrap();
    assert_eq!(store.writes().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn manual_save_during_a_save_runs_right_after_it() {
    let store = RecordingStore::new(Duration::from_millis(1000));
    let (tx, task) = spawn_runner(store.clone());

    tx.send(SheetCommand::Load).await.unwrap();
    tx.send(edit(SheetField::Name, "one")).await.unwrap();
    tx.send(SheetCommand::Save).await.unwrap();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(store.writes().len(), 1);

    tx.send(edit(SheetField::Name, "two")).await.unwrap();
    tx.send(SheetCommand::Save).await.unwrap();
    sleep(Duration::from_millis(950)).await;
    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    assert!(writes[1].0 >= Duration::from_millis(1000));
    assert_eq!(writes[1].1.name, "two");

    drop(tx);
    task.await.unwrap();
    assert_eq!(store.writes().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn edit_during_a_save_keeps_the_sheet_unsaved() {
    let store = RecordingStore::new(Duration::from_millis(1000));
    let session = SheetSession::new(
        Slug::new("troy").ok(),
        store.clone(),
        Arc::new(SystemClock::new()),
    );
    let (tx, rx) = mpsc::channel(16);
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let runner = SheetRunner::new(session, AutosaveState::new(DELAY)).with_events(events_tx);
    let task = tokio::spawn(runner.run(rx));

    tx.send(SheetCommand::Load).await.unwrap();
    tx.send(edit(SheetField::Name, "one")).await.unwrap();

    // First save runs from 1.5s to 2.5s; this edit lands in the middle
    sleep(Duration::from_millis(2000)).await;
    tx.send(edit(SheetField::Name, "two")).await.unwrap();

    sleep(Duration::from_millis(600)).await;
    assert_eq!(store.writes().len(), 1);
    assert_eq!(last_status(&mut events), Some(SheetStatus::Unsaved));

    // The edit's own cycle saves at 3.5s
    sleep(Duration::from_millis(2000)).await;
    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[1].1.name, "two");
    assert_eq!(last_status(&mut events), Some(SheetStatus::Saved));

    drop(tx);
    task.await.unwrap();
}
