//! Session state and its transitions.
//!
//! [`SessionState`] is an immutable snapshot. [`SessionState::apply`]
//! consumes an [`Action`] and returns a whole new snapshot plus at most one
//! side [`Effect`] for the controller to run. Nothing mutates a snapshot in
//! place, so an effect always carries the data as it was when the action
//! was dispatched.

pub mod controller;

use chrono::NaiveDate;

use crate::constants::UNKNOWN_LOCATION;
use crate::journal::{date_key, is_same_day, JournalEntry};

pub use self::controller::{Journal, SwitchOutcome};

/// Status line shown before the first action.
pub const WELCOME_STATUS: &str = "Welcome to the journal.";

/// Snapshot of what the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current_date: NaiveDate,
    pub status: String,
    pub current_entry: Option<JournalEntry>,
    /// Unsaved edits exist for `current_entry`.
    pub edited: bool,
}

/// Every transition the presentation layer can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ManuallySave,
    /// Switch to `date`, showing `entry` or a placeholder when `None`.
    UpdateDate {
        date: NaiveDate,
        entry: Option<JournalEntry>,
    },
    UpdateFeeling(String),
    UpdateWeather(String),
    UpdateText(String),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist `entry` for `date` now.
    Save { date: NaiveDate, entry: JournalEntry },
    /// Ask the user whether to persist `entry` for `date`, then save if confirmed.
    PromptSave { date: NaiveDate, entry: JournalEntry },
}

/// Values a transition reads from outside the snapshot.
#[derive(Debug, Clone)]
pub struct TransitionContext {
    pub today: NaiveDate,
    pub location: String,
}

/// A new snapshot and the effect to run, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn pure(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

impl SessionState {
    /// Startup snapshot on `today`, seeded with the handshake's entry if any.
    pub fn initial(today: NaiveDate, entry: Option<JournalEntry>) -> Self {
        Self {
            current_date: today,
            status: WELCOME_STATUS.to_string(),
            current_entry: entry,
            edited: false,
        }
    }

    fn edited_entry(&self) -> JournalEntry {
        self.current_entry.clone().unwrap_or_default()
    }

    /// Computes the transition for `action`.
    pub fn apply(&self, action: Action, ctx: &TransitionContext) -> Transition {
        match action {
            Action::ManuallySave => {
                if self.edited {
                    let effect = self.current_entry.clone().map(|entry| Effect::Save {
                        date: self.current_date,
                        entry,
                    });
                    Transition {
                        state: SessionState {
                            edited: false,
                            status: "Saved.".to_string(),
                            ..self.clone()
                        },
                        effect,
                    }
                } else {
                    Transition::pure(SessionState {
                        edited: false,
                        status: "Saved. (No modify)".to_string(),
                        ..self.clone()
                    })
                }
            }
            Action::UpdateDate { date, entry } => {
                let effect = match &self.current_entry {
                    Some(snapshot) if self.edited && is_same_day(self.current_date, ctx.today) => {
                        Some(Effect::PromptSave {
                            date: self.current_date,
                            entry: snapshot.clone(),
                        })
                    }
                    _ => None,
                };

                let entry = entry.unwrap_or_else(|| {
                    if is_same_day(date, ctx.today) {
                        JournalEntry::placeholder(ctx.location.clone())
                    } else {
                        JournalEntry::placeholder(UNKNOWN_LOCATION)
                    }
                });

                Transition {
                    state: SessionState {
                        current_date: date,
                        status: format!("Date changed to {}", date_key(date)),
                        current_entry: Some(entry),
                        edited: false,
                    },
                    effect,
                }
            }
            Action::UpdateFeeling(feeling) => Transition::pure(SessionState {
                status: "Editing feeling...".to_string(),
                edited: true,
                current_entry: Some(JournalEntry {
                    feeling: Some(feeling),
                    ..self.edited_entry()
                }),
                ..self.clone()
            }),
            Action::UpdateWeather(weather) => Transition::pure(SessionState {
                status: "Editing weather...".to_string(),
                edited: true,
                current_entry: Some(JournalEntry {
                    weather: Some(weather),
                    ..self.edited_entry()
                }),
                ..self.clone()
            }),
            Action::UpdateText(body) => Transition::pure(SessionState {
                status: "Editing journal...".to_string(),
                edited: true,
                current_entry: Some(JournalEntry {
                    body: Some(body),
                    ..self.edited_entry()
                }),
                ..self.clone()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn ctx() -> TransitionContext {
        TransitionContext {
            today: day(14),
            location: "Here".to_string(),
        }
    }

    fn entry(body: &str) -> JournalEntry {
        JournalEntry {
            weather: Some("cloudy".to_string()),
            feeling: Some("fine".to_string()),
            location: Some("Here".to_string()),
            body: Some(body.to_string()),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = SessionState::initial(day(14), None);
        assert_eq!(state.current_date, day(14));
        assert_eq!(state.status, WELCOME_STATUS);
        assert!(state.current_entry.is_none());
        assert!(!state.edited);
    }

    #[test]
    fn test_update_text_marks_edited() {
        let state = SessionState::initial(day(14), None);
        let next = state.apply(Action::UpdateText("hello".to_string()), &ctx());

        assert!(next.effect.is_none());
        assert!(next.state.edited);
        assert_eq!(next.state.status, "Editing journal...");
        assert_eq!(
            next.state.current_entry.unwrap().body.as_deref(),
            Some("hello")
        );
        // previous snapshot untouched
        assert!(!state.edited);
        assert!(state.current_entry.is_none());
    }

    #[test]
    fn test_update_feeling_and_weather_keep_other_fields() {
        let state = SessionState::initial(day(14), Some(entry("body")));
        let next = state
            .apply(Action::UpdateFeeling("great".to_string()), &ctx())
            .state;
        assert_eq!(next.status, "Editing feeling...");
        let next = next
            .apply(Action::UpdateWeather("rainy".to_string()), &ctx())
            .state;
        assert_eq!(next.status, "Editing weather...");

        let current = next.current_entry.unwrap();
        assert_eq!(current.feeling.as_deref(), Some("great"));
        assert_eq!(current.weather.as_deref(), Some("rainy"));
        assert_eq!(current.body.as_deref(), Some("body"));
    }

    #[test]
    fn test_manual_save_with_edits_requests_save() {
        let state = SessionState::initial(day(14), None)
            .apply(Action::UpdateText("draft".to_string()), &ctx())
            .state;
        let next = state.apply(Action::ManuallySave, &ctx());

        assert_eq!(next.state.status, "Saved.");
        assert!(!next.state.edited);
        match next.effect {
            Some(Effect::Save { date, entry }) => {
                assert_eq!(date, day(14));
                assert_eq!(entry.body.as_deref(), Some("draft"));
            }
            other => panic!("Expected save effect, got {:?}", other),
        }
    }

    #[test]
    fn test_manual_save_without_edits() {
        let state = SessionState::initial(day(14), Some(entry("stored")));
        let next = state.apply(Action::ManuallySave, &ctx());
        assert_eq!(next.state.status, "Saved. (No modify)");
        assert!(next.effect.is_none());
    }

    #[test]
    fn test_switch_away_from_edited_today_prompts_with_pre_switch_snapshot() {
        let state = SessionState::initial(day(14), Some(entry("before")))
            .apply(Action::UpdateText("edited today".to_string()), &ctx())
            .state;

        let next = state.apply(
            Action::UpdateDate {
                date: day(3),
                entry: Some(entry("old day")),
            },
            &ctx(),
        );

        match next.effect {
            Some(Effect::PromptSave { date, entry }) => {
                assert_eq!(date, day(14));
                assert_eq!(entry.body.as_deref(), Some("edited today"));
            }
            other => panic!("Expected prompt effect, got {:?}", other),
        }
        assert_eq!(next.state.current_date, day(3));
        assert_eq!(
            next.state.current_entry.unwrap().body.as_deref(),
            Some("old day")
        );
        assert!(!next.state.edited);
    }

    #[test]
    fn test_switch_without_edits_does_not_prompt() {
        let state = SessionState::initial(day(14), Some(entry("before")));
        let next = state.apply(
            Action::UpdateDate {
                date: day(3),
                entry: None,
            },
            &ctx(),
        );
        assert!(next.effect.is_none());
    }

    #[test]
    fn test_switch_from_edited_past_day_does_not_prompt() {
        let state = SessionState::initial(day(3), Some(entry("past")))
            .apply(Action::UpdateText("poke".to_string()), &ctx())
            .state;
        let next = state.apply(
            Action::UpdateDate {
                date: day(14),
                entry: None,
            },
            &ctx(),
        );
        assert!(next.effect.is_none());
    }

    #[test]
    fn test_switch_to_empty_day_synthesizes_placeholder() {
        let state = SessionState::initial(day(14), None);

        let past = state
            .apply(
                Action::UpdateDate {
                    date: day(3),
                    entry: None,
                },
                &ctx(),
            )
            .state;
        let past_entry = past.current_entry.clone().unwrap();
        assert_eq!(past_entry.location.as_deref(), Some("Unknown"));
        assert_eq!(past_entry.body.as_deref(), Some(""));
        assert_eq!(past.status, "Date changed to Sat Oct 03 2026");

        let today = past
            .apply(
                Action::UpdateDate {
                    date: day(14),
                    entry: None,
                },
                &ctx(),
            )
            .state;
        assert_eq!(
            today.current_entry.unwrap().location.as_deref(),
            Some("Here")
        );
    }
}
