//! UI-facing journal controller.
//!
//! Owns the current [`SessionState`] snapshot and turns user operations into
//! transitions, running the effects they request against [`JournalSync`].
//! Snapshots are swapped whole under a short lock that is never held across
//! an await.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::errors::SyncError;
use crate::journal::{date_key, FetchOutcome, JournalEntry, JournalSync, SaveOutcome};
use crate::prompt::{Interaction, Notice};
use crate::session::{Action, Effect, SessionState, TransitionContext};

/// What happened to a date switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The new date is now current.
    Switched,
    /// The date is after today; nothing changed.
    FutureRejected,
    /// The handshake has not finished; nothing changed.
    NotReady,
    /// A newer switch started while this one was fetching; its result was dropped.
    Superseded,
}

/// The journal as seen by the presentation layer.
pub struct Journal<I: Interaction> {
    sync: JournalSync,
    interaction: Arc<I>,
    state: Mutex<Arc<SessionState>>,
    generation: AtomicU64,
}

impl<I: Interaction> Journal<I> {
    pub fn new(sync: JournalSync, initial: SessionState, interaction: Arc<I>) -> Self {
        Self {
            sync,
            interaction,
            state: Mutex::new(Arc::new(initial)),
            generation: AtomicU64::new(0),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<SessionState> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sync(&self) -> &JournalSync {
        &self.sync
    }

    fn dispatch(&self, action: Action) -> Option<Effect> {
        let ctx = TransitionContext {
            today: self.sync.today(),
            location: self.sync.location(),
        };

        let mut current = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let transition = current.apply(action, &ctx);
        *current = Arc::new(transition.state);
        transition.effect
    }

    fn is_stale(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != ticket
    }

    async fn run_effect(&self, effect: Option<Effect>) -> Option<Result<SaveOutcome, SyncError>> {
        match effect? {
            Effect::Save { date, entry } => Some(self.persist(date, &entry).await),
            Effect::PromptSave { date, entry } => {
                let interaction = self.interaction.clone();
                let prompt = tokio::task::spawn_blocking(move || interaction.confirm_save(date));
                let confirmed = prompt.await.unwrap_or_else(|e| {
                    warn!("Save prompt failed: {}", e);
                    false
                });
                if confirmed {
                    Some(self.persist(date, &entry).await)
                } else {
                    debug!("User declined saving {}", date_key(date));
                    None
                }
            }
        }
    }

    async fn persist(
        &self,
        date: NaiveDate,
        entry: &JournalEntry,
    ) -> Result<SaveOutcome, SyncError> {
        let result = self.sync.save(date, entry).await;
        match &result {
            Ok(SaveOutcome::Saved) => self.interaction.notify(&Notice::Saved(date)),
            Ok(SaveOutcome::Skipped(reason)) => debug!("Save skipped: {:?}", reason),
            Err(e) => {
                warn!("Save failed: {}", e);
                self.interaction.notify(&Notice::SaveFailed(e.to_string()));
            }
        }
        result
    }

    /// Opens `date`, fetching its entry from the server.
    ///
    /// Leaving today's day with unsaved edits asks the user whether to save
    /// the entry as it was before the switch.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after notifying the user; the current
    /// snapshot is left unchanged. A failure that lands after a newer switch
    /// started is dropped silently as `Superseded`.
    pub async fn switch_date(&self, date: NaiveDate) -> Result<SwitchOutcome, SyncError> {
        if date > self.sync.today() {
            self.interaction.notify(&Notice::FutureDate);
            return Ok(SwitchOutcome::FutureRejected);
        }
        if !self.sync.is_ready() {
            return Ok(SwitchOutcome::NotReady);
        }

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Switching date to {}", date_key(date));

        let fetched = match self.sync.fetch(date).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if self.is_stale(ticket) {
                    debug!("Dropping stale fetch failure for {}: {}", date_key(date), e);
                    return Ok(SwitchOutcome::Superseded);
                }
                warn!("Fetch failed: {}", e);
                self.interaction.notify(&Notice::LoadFailed);
                return Err(e);
            }
        };

        if self.is_stale(ticket) {
            debug!("Dropping stale fetch for {}", date_key(date));
            return Ok(SwitchOutcome::Superseded);
        }

        let entry = match fetched {
            FetchOutcome::Entry(entry) => Some(entry),
            FetchOutcome::NoData => {
                self.interaction.notify(&Notice::NoDataForDay(date));
                None
            }
        };

        let effect = self.dispatch(Action::UpdateDate { date, entry });
        // save failures were already reported by persist
        let _ = self.run_effect(effect).await;
        Ok(SwitchOutcome::Switched)
    }

    /// Saves the current entry if it has unsaved edits.
    ///
    /// Returns `None` when there was nothing to save.
    pub async fn manually_save(&self) -> Option<Result<SaveOutcome, SyncError>> {
        let effect = self.dispatch(Action::ManuallySave);
        self.run_effect(effect).await
    }

    pub fn update_text(&self, body: impl Into<String>) {
        self.dispatch(Action::UpdateText(body.into()));
    }

    pub fn update_feeling(&self, feeling: impl Into<String>) {
        self.dispatch(Action::UpdateFeeling(feeling.into()));
    }

    pub fn update_weather(&self, weather: impl Into<String>) {
        self.dispatch(Action::UpdateWeather(weather.into()));
    }
}
