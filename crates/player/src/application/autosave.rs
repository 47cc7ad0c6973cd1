//! Debounced autosave scheduling.
//!
//! `AutosaveState` is pure bookkeeping: callers pass the current instant in
//! and act on the returned decision. The runner owns the actual timer.

use std::time::Duration;

use tokio::time::Instant;

/// Default quiet period between the last edit and the autosave.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1500);

/// What to do with a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDecision {
    /// Begin a save now.
    Start,
    /// A save is in flight; another debounce cycle follows it.
    Deferred,
    /// A save is in flight; a save starts as soon as it completes.
    Queued,
}

/// What to do once an in-flight save has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSave {
    Idle,
    /// A new debounce cycle was armed.
    Debounce,
    /// A queued manual save must start now.
    SaveNow,
}

#[derive(Debug, Clone)]
pub struct AutosaveState {
    delay: Duration,
    deadline: Option<Instant>,
    in_flight: bool,
    pending: bool,
    manual_queued: bool,
}

impl Default for AutosaveState {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

impl AutosaveState {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            in_flight: false,
            pending: false,
            manual_queued: false,
        }
    }

    /// When the armed timer is due, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Restarts the timer: the save happens `delay` after the latest edit.
    pub fn note_edit(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// The timer elapsed.
    pub fn fire(&mut self) -> SaveDecision {
        self.deadline = None;
        if self.in_flight {
            self.pending = true;
            return SaveDecision::Deferred;
        }
        self.in_flight = true;
        SaveDecision::Start
    }

    /// An explicit save request. Cancels the armed timer and any deferred
    /// request since the manual save covers them.
    pub fn request_manual(&mut self) -> SaveDecision {
        self.deadline = None;
        self.pending = false;
        if self.in_flight {
            self.manual_queued = true;
            return SaveDecision::Queued;
        }
        self.in_flight = true;
        SaveDecision::Start
    }

    /// The in-flight save completed (successfully or not).
    pub fn finish(&mut self, now: Instant) -> AfterSave {
        self.in_flight = false;
        if self.manual_queued {
            self.manual_queued = false;
            self.pending = false;
            self.deadline = None;
            self.in_flight = true;
            return AfterSave::SaveNow;
        }
        if self.pending {
            self.pending = false;
            self.note_edit(now);
            return AfterSave::Debounce;
        }
        AfterSave::Idle
    }

    /// Drops a save that was started but could not run (e.g. the form did
    /// not serialize).
    pub fn abandon(&mut self) {
        self.in_flight = false;
    }

    /// True while anything is scheduled or running.
    pub fn has_work(&self) -> bool {
        self.deadline.is_some() || self.in_flight || self.manual_queued
    }
}
