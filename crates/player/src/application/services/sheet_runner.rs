//! Sheet runner - drives a [`SheetSession`] from a command channel.
//!
//! One task owns the session and its autosave state. Saves run inside the
//! same `select!` loop as command intake, so edits keep arriving while a
//! write is in flight.

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::application::autosave::{AfterSave, AutosaveState, SaveDecision};
use crate::application::form::SheetField;

use super::sheet_session::{LoadOutcome, SheetSession, SheetStatus, WriteOutcome};

/// A user action on the sheet page.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCommand {
    Load,
    Edit { field: SheetField, value: String },
    Save,
}

/// Notifications for whoever renders the page.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    Loaded(LoadOutcome),
    Status(SheetStatus),
}

type InFlight = Option<BoxFuture<'static, WriteOutcome>>;

pub struct SheetRunner {
    session: SheetSession,
    autosave: AutosaveState,
    events: Option<mpsc::UnboundedSender<SheetEvent>>,
}

impl SheetRunner {
    pub fn new(session: SheetSession, autosave: AutosaveState) -> Self {
        Self {
            session,
            autosave,
            events: None,
        }
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<SheetEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Processes commands until the channel closes, then flushes any
    /// scheduled save and hands the session back.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SheetCommand>) -> SheetSession {
        let mut in_flight: InFlight = None;
        let mut open = true;

        loop {
            if !open && !self.autosave.has_work() {
                break;
            }
            let deadline = self.autosave.deadline();
            let saving = in_flight.is_some();

            tokio::select! {
                command = commands.recv(), if open => match command {
                    Some(command) => self.handle(command, &mut in_flight).await,
                    None => {
                        open = false;
                        self.flush(&mut in_flight);
                    }
                },
                () = sleep_until_deadline(deadline), if deadline.is_some() => {
                    match self.autosave.fire() {
                        SaveDecision::Start => self.start_save(&mut in_flight),
                        _ => tracing::debug!("Autosave deferred behind in-flight save"),
                    }
                },
                outcome = wait_in_flight(&mut in_flight), if saving => {
                    in_flight = None;
                    self.complete(outcome, &mut in_flight);
                },
            }
        }

        self.session
    }

    async fn handle(&mut self, command: SheetCommand, in_flight: &mut InFlight) {
        match command {
            SheetCommand::Load => {
                self.emit(SheetEvent::Status(SheetStatus::Loading));
                let outcome = self.session.load().await;
                self.emit(SheetEvent::Loaded(outcome));
                self.emit_status();
            }
            SheetCommand::Edit { field, value } => {
                if self.session.edit(field, &value) {
                    self.autosave.note_edit(Instant::now());
                    self.emit_status();
                }
            }
            SheetCommand::Save => match self.autosave.request_manual() {
                SaveDecision::Start => self.start_save(in_flight),
                _ => tracing::debug!("Manual save queued behind in-flight save"),
            },
        }
    }

    fn flush(&mut self, in_flight: &mut InFlight) {
        if self.autosave.deadline().is_some() {
            if let SaveDecision::Start = self.autosave.request_manual() {
                self.start_save(in_flight);
            }
        }
    }

    fn start_save(&mut self, in_flight: &mut InFlight) {
        match self.session.begin_save() {
            Ok(Some(write)) => {
                *in_flight = Some(Box::pin(write.run()));
            }
            Ok(None) => self.autosave.abandon(),
            Err(e) => {
                tracing::debug!(error = %e, "Save abandoned");
                self.autosave.abandon();
            }
        }
        self.emit_status();
    }

    fn complete(&mut self, outcome: WriteOutcome, in_flight: &mut InFlight) {
        let saved = match self.session.finish_save(outcome) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Save completed with an error");
                false
            }
        };

        let next = self.autosave.finish(Instant::now());
        // Edits made during the write are still waiting for the next cycle
        if saved && self.autosave.deadline().is_some() {
            self.session.mark_unsaved();
        }
        self.emit_status();

        if next == AfterSave::SaveNow {
            self.start_save(in_flight);
        }
    }

    fn emit_status(&self) {
        self.emit(SheetEvent::Status(self.session.status().clone()));
    }

    fn emit(&self, event: SheetEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn wait_in_flight(in_flight: &mut InFlight) -> WriteOutcome {
    match in_flight.as_mut() {
        Some(write) => write.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::ports::outbound::{MockClockPort, MockRecordStore, StoreError, StoredRecord};
    use chrono::Utc;
    use serde_json::json;
    use sheetkeep_domain::Slug;

    fn clock() -> Arc<MockClockPort> {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(Utc::now);
        Arc::new(clock)
    }

    fn loaded_store() -> MockRecordStore {
        let mut store = MockRecordStore::new();
        store.expect_fetch().returning(|_| {
            Ok(StoredRecord {
                data: json!({ "name": "Troy" }),
                updated_at: None,
            })
        });
        store
    }

    fn runner(store: MockRecordStore) -> SheetRunner {
        let session = SheetSession::new(Slug::new("troy").ok(), Arc::new(store), clock());
        SheetRunner::new(session, AutosaveState::new(Duration::from_millis(1500)))
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_channel_flushes_pending_edits() {
        let mut store = loaded_store();
        store
            .expect_upsert()
            .withf(|_, record, _| record.notes == "flushed")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (tx, rx) = mpsc::channel(8);
        tx.send(SheetCommand::Load).await.unwrap();
        tx.send(SheetCommand::Edit {
            field: SheetField::Notes,
            value: "flushed".into(),
        })
        .await
        .unwrap();
        drop(tx);

        let session = runner(store).run(rx).await;
        assert_eq!(session.status(), &SheetStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn edits_before_load_are_ignored() {
        let mut store = MockRecordStore::new();
        store
            .expect_fetch()
            .returning(|slug| Err(StoreError::not_found(slug)));
        store.expect_upsert().times(0);

        let (tx, rx) = mpsc::channel(8);
        tx.send(SheetCommand::Load).await.unwrap();
        tx.send(SheetCommand::Edit {
            field: SheetField::Name,
            value: "Ayla".into(),
        })
        .await
        .unwrap();
        tx.send(SheetCommand::Save).await.unwrap();
        drop(tx);

        let session = runner(store).run(rx).await;
        assert_eq!(session.status(), &SheetStatus::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn events_report_status_changes() {
        let mut store = loaded_store();
        store.expect_upsert().returning(|_, _, _| Ok(()));

        let (tx, rx) = mpsc::channel(8);
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        tx.send(SheetCommand::Load).await.unwrap();
        tx.send(SheetCommand::Save).await.unwrap();
        drop(tx);

        runner(store).with_events(events_tx).run(rx).await;

        let mut seen = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            seen.push(event);
        }
        assert!(seen.contains(&SheetEvent::Loaded(LoadOutcome::Loaded)));
        assert!(seen.contains(&SheetEvent::Status(SheetStatus::Saving)));
        assert_eq!(seen.last(), Some(&SheetEvent::Status(SheetStatus::Saved)));
    }
}
