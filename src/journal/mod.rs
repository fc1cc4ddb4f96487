//! Journal entries and date identity.
//!
//! One entry exists per calendar day. Days are identified by the
//! `"%a %b %d %Y"` date key and compared as strings; the server addresses
//! them as `YYYY/M/D` without zero padding.

pub mod sync;

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DATE_KEY_FORMAT, DEFAULT_FEELING, DEFAULT_SAVE_WEATHER, PLACEHOLDER_WEATHER, UNKNOWN_LOCATION,
};

pub use self::sync::{FetchOutcome, JournalSync, SaveOutcome, SkipReason};

/// Source of "today" for everything that compares against the current day.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// A clock reading the local calendar date.
pub fn local_clock() -> Clock {
    Arc::new(|| Local::now().date_naive())
}

/// A clock frozen on `date`.
pub fn fixed_clock(date: NaiveDate) -> Clock {
    Arc::new(move || date)
}

/// The day identity of `date`, e.g. `"Wed Oct 14 2026"`.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Whether two dates fall on the same day, by date-key comparison.
pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    date_key(a) == date_key(b)
}

/// Server resource path for `date`, e.g. `"2026/10/4"`.
pub fn resource_path(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.year(), date.month(), date.day())
}

/// One day's journal record.
///
/// Fields the user never touched stay `None` until a save fills defaults.
///
/// # Examples
///
/// ```
/// use diary_client::journal::JournalEntry;
///
/// let entry: JournalEntry = serde_json::from_str(r#"{"body":"<p>hi</p>"}"#).unwrap();
/// assert_eq!(entry.body.as_deref(), Some("<p>hi</p>"));
/// assert!(entry.weather.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub feeling: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Rich text, stored as its serialized string form.
    #[serde(default)]
    pub body: Option<String>,
}

impl JournalEntry {
    /// The entry shown for a day the server has no data for.
    pub fn placeholder(location: impl Into<String>) -> Self {
        Self {
            weather: Some(PLACEHOLDER_WEATHER.to_string()),
            feeling: Some(DEFAULT_FEELING.to_string()),
            location: Some(location.into()),
            body: Some(String::new()),
        }
    }

    /// Whether there is any body text worth persisting.
    pub fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|body| !body.is_empty())
    }

    /// Copy with `feeling` and `weather` defaulted for upload.
    pub fn with_save_defaults(&self) -> Self {
        Self {
            weather: Some(
                self.weather
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SAVE_WEATHER.to_string()),
            ),
            feeling: Some(
                self.feeling
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FEELING.to_string()),
            ),
            location: self.location.clone(),
            body: self.body.clone(),
        }
    }

    /// Location to display, falling back to `"Unknown"`.
    pub fn location_or_unknown(&self) -> &str {
        self.location.as_deref().unwrap_or(UNKNOWN_LOCATION)
    }
}
