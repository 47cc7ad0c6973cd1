//! Sheet session - the controller behind one hosted sheet page.
//!
//! Owns the form model for one slug and drives load and save against a
//! [`RecordStore`]. Status lines are the user-facing outcome of every
//! operation; nothing here returns an error the page cannot recover from.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sheetkeep_domain::{AbilityScores, CharacterRecord, Slug};

use crate::application::error::SaveError;
use crate::application::form::{SheetField, SheetForm};
use crate::ports::outbound::{ClockPort, RecordStore, StoreError};

/// Example page address shown when the slug is missing.
pub const EXAMPLE_PAGE: &str = "character.html?troy";

/// The status line of a sheet page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetStatus {
    NoCharacter,
    Loading,
    NotFound,
    Ready,
    Unsaved,
    Saving,
    Saved,
    /// The form did not serialize; carries the parser message.
    InvalidInput(String),
    SaveFailed,
}

impl fmt::Display for SheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCharacter => f.write_str("No character specified."),
            Self::Loading => f.write_str("Loading…"),
            Self::NotFound => f.write_str(
                "Not found in DB. Create a row with this slug in the characters table.",
            ),
            Self::Ready => f.write_str("Ready."),
            Self::Unsaved => f.write_str("Unsaved…"),
            Self::Saving => f.write_str("Saving…"),
            Self::Saved => f.write_str("Saved ✔"),
            Self::InvalidInput(message) => write!(f, "Save failed: {}", message),
            Self::SaveFailed => f.write_str("Save failed (check logs)."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    MissingSlug,
    NotFound,
    Loaded,
}

/// A serialized record ready to be written.
///
/// Produced by [`SheetSession::begin_save`]; running it does not borrow the
/// session, so the caller may keep accepting edits while it is in flight.
pub struct PendingWrite {
    store: Arc<dyn RecordStore>,
    slug: Slug,
    record: CharacterRecord,
    updated_at: DateTime<Utc>,
}

impl PendingWrite {
    pub async fn run(self) -> WriteOutcome {
        let result = self
            .store
            .upsert(&self.slug, &self.record, self.updated_at)
            .await;
        WriteOutcome {
            updated_at: self.updated_at,
            result,
        }
    }
}

#[derive(Debug)]
pub struct WriteOutcome {
    pub updated_at: DateTime<Utc>,
    pub result: Result<(), StoreError>,
}

pub struct SheetSession {
    slug: Option<Slug>,
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn ClockPort>,
    form: SheetForm,
    ready: bool,
    status: SheetStatus,
    updated_at: Option<DateTime<Utc>>,
}

impl SheetSession {
    pub fn new(slug: Option<Slug>, store: Arc<dyn RecordStore>, clock: Arc<dyn ClockPort>) -> Self {
        let status = if slug.is_some() {
            SheetStatus::Loading
        } else {
            SheetStatus::NoCharacter
        };
        Self {
            slug,
            store,
            clock,
            form: SheetForm::default(),
            ready: false,
            status,
            updated_at: None,
        }
    }

    pub fn slug(&self) -> Option<&Slug> {
        self.slug.as_ref()
    }

    pub fn status(&self) -> &SheetStatus {
        &self.status
    }

    /// The guidance line under the title.
    pub fn key_line(&self) -> String {
        match &self.slug {
            Some(slug) => format!("Character key: {}", slug),
            None => format!("Missing character key. Use: {}", EXAMPLE_PAGE),
        }
    }

    pub fn form(&self) -> &SheetForm {
        &self.form
    }

    pub fn modifiers(&self) -> AbilityScores<String> {
        self.form.modifiers()
    }

    /// True once a record was loaded; editing and saving are enabled only then.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Timestamp of the last successful load or save.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Fetches the record for this page's slug into the form.
    ///
    /// Without a slug the store is never contacted.
    pub async fn load(&mut self) -> LoadOutcome {
        let Some(slug) = self.slug.clone() else {
            self.ready = false;
            self.status = SheetStatus::NoCharacter;
            return LoadOutcome::MissingSlug;
        };

        self.status = SheetStatus::Loading;
        tracing::debug!(slug = %slug, "Loading character");

        match self.store.fetch(&slug).await {
            Ok(stored) => {
                let record = CharacterRecord::from_stored(stored.data);
                self.form = SheetForm::from_record(&record);
                self.updated_at = stored.updated_at;
                self.ready = true;
                self.status = SheetStatus::Ready;
                tracing::info!(slug = %slug, "Character loaded");
                LoadOutcome::Loaded
            }
            Err(e) => {
                if e.is_not_found() {
                    tracing::warn!(slug = %slug, "No stored character for slug");
                } else {
                    tracing::error!(slug = %slug, error = %e, "Failed to load character");
                }
                self.ready = false;
                self.status = SheetStatus::NotFound;
                LoadOutcome::NotFound
            }
        }
    }

    /// Creates a blank record for this page's slug when none exists, then
    /// loads it. An existing record is loaded untouched.
    ///
    /// Stores that cannot create rows (the hosted table) leave the slug
    /// missing, and the load reports it as not found.
    pub async fn create(&mut self) -> Result<LoadOutcome, SaveError> {
        let Some(slug) = self.slug.clone() else {
            return Ok(self.load().await);
        };

        match self.store.fetch(&slug).await {
            Ok(_) => tracing::debug!(slug = %slug, "Character already exists"),
            Err(e) if e.is_not_found() => {
                let blank = CharacterRecord::default();
                if let Err(e) = self.store.upsert(&slug, &blank, self.clock.now()).await {
                    tracing::error!(slug = %slug, error = %e, "Failed to create character");
                    self.status = SheetStatus::SaveFailed;
                    return Err(SaveError::Store(e));
                }
                tracing::info!(slug = %slug, "Blank character created");
            }
            Err(e) => {
                tracing::error!(slug = %slug, error = %e, "Failed to look up character");
                self.status = SheetStatus::NotFound;
                return Err(SaveError::Store(e));
            }
        }

        Ok(self.load().await)
    }

    /// Marks the form as changed since the last save.
    pub fn mark_unsaved(&mut self) {
        if self.ready {
            self.status = SheetStatus::Unsaved;
        }
    }

    /// Applies one edit. Returns true when the edit was accepted, meaning
    /// an autosave is now due.
    pub fn edit(&mut self, field: SheetField, value: &str) -> bool {
        if !self.ready {
            tracing::debug!(field = %field, "Ignoring edit before load");
            return false;
        }
        self.form.set(field, value);
        self.status = SheetStatus::Unsaved;
        true
    }

    /// Serializes the form into a write.
    ///
    /// Returns `Ok(None)` when the page is not ready. On invalid input the
    /// status line carries the parser message and nothing is written.
    pub fn begin_save(&mut self) -> Result<Option<PendingWrite>, SaveError> {
        let Some(slug) = self.slug.clone().filter(|_| self.ready) else {
            return Ok(None);
        };

        let record = match self.form.to_record() {
            Ok(record) => record,
            Err(e) => {
                let err = SaveError::from(e);
                tracing::warn!(slug = %slug, error = %err, "Form did not serialize");
                self.status =
                    SheetStatus::InvalidInput(err.input_message().unwrap_or_default().to_string());
                return Err(err);
            }
        };

        self.status = SheetStatus::Saving;
        Ok(Some(PendingWrite {
            store: Arc::clone(&self.store),
            slug,
            record,
            updated_at: self.clock.now(),
        }))
    }

    /// Records the outcome of a write started by [`Self::begin_save`].
    pub fn finish_save(&mut self, outcome: WriteOutcome) -> Result<(), SaveError> {
        match outcome.result {
            Ok(()) => {
                self.updated_at = Some(outcome.updated_at);
                self.status = SheetStatus::Saved;
                tracing::info!(
                    slug = ?self.slug.as_ref().map(Slug::as_str),
                    "Character saved"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    slug = ?self.slug.as_ref().map(Slug::as_str),
                    error = %e,
                    "Failed to save character"
                );
                self.status = SheetStatus::SaveFailed;
                Err(SaveError::Store(e))
            }
        }
    }

    /// Saves immediately. Returns false when the page is not ready.
    pub async fn save(&mut self) -> Result<bool, SaveError> {
        let Some(write) = self.begin_save()? else {
            return Ok(false);
        };
        let outcome = write.run().await;
        self.finish_save(outcome)?;
        Ok(true)
    }
}
