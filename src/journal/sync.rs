//! Fetch and save of encrypted journal entries.
//!
//! Every operation checks the vault's auth interlock first and performs no
//! network call while the handshake is unfinished. Saves only ever target
//! today: past days are read-only from the client's side.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::crypto::{codec, KeyVault};
use crate::errors::{CryptoError, SyncError};
use crate::journal::{date_key, is_same_day, resource_path, Clock, JournalEntry};
use crate::location::LocationCell;
use crate::remote::{is_no_data, RemoteStore};

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server holds a verified entry for the day.
    Entry(JournalEntry),
    /// The server has nothing for the day; the caller synthesizes a default.
    NoData,
}

/// Why a save did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry belongs to a day other than today.
    NotToday,
    /// The body was empty or absent.
    EmptyBody,
}

/// Result of a successful save call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Skipped(SkipReason),
}

/// Exchanges encrypted entries with the server for an authenticated session.
pub struct JournalSync {
    vault: Arc<KeyVault>,
    remote: Arc<RemoteStore>,
    location: LocationCell,
    clock: Clock,
}

impl JournalSync {
    pub fn new(
        vault: Arc<KeyVault>,
        remote: Arc<RemoteStore>,
        location: LocationCell,
        clock: Clock,
    ) -> Self {
        Self {
            vault,
            remote,
            location,
            clock,
        }
    }

    /// Whether the handshake has finished.
    pub fn is_ready(&self) -> bool {
        self.vault.is_auth_finished()
    }

    /// Today according to the session clock.
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Current best-known location.
    pub fn location(&self) -> String {
        self.location.get()
    }

    fn token(&self) -> Result<String, SyncError> {
        if !self.vault.is_auth_finished() {
            return Err(SyncError::NotReady);
        }
        self.vault.auth_token().ok_or(SyncError::NotReady)
    }

    /// Fetches and verifies the entry for `date`.
    ///
    /// # Errors
    ///
    /// - `SyncError::NotReady` before authentication (no request is sent)
    /// - `SyncError::Unreachable` / `SyncError::Rejected` on transport failures
    /// - `SyncError::Corrupt` when the payload fails verification
    pub async fn fetch(&self, date: NaiveDate) -> Result<FetchOutcome, SyncError> {
        let token = self.token()?;
        debug!("Fetching entry for {}", date_key(date));

        let body = self.remote.fetch_entry(&resource_path(date), &token).await?;
        if is_no_data(&body) {
            debug!("No entry stored for {}", date_key(date));
            return Ok(FetchOutcome::NoData);
        }

        let private = self.vault.private_key().map_err(SyncError::Crypto)?;
        let public = self.vault.public_key().map_err(SyncError::Crypto)?;
        let plaintext = codec::decrypt_and_verify(body, public, private)
            .await
            .map_err(|e| {
                warn!("Fetched entry failed verification");
                match e {
                    CryptoError::TaskFailed(_) => SyncError::Crypto(e),
                    _ => SyncError::Corrupt,
                }
            })?;

        let entry: JournalEntry =
            serde_json::from_slice(&plaintext).map_err(|_| SyncError::Corrupt)?;
        Ok(FetchOutcome::Entry(entry))
    }

    /// Encrypts, signs and uploads `entry` if `date` is today.
    ///
    /// The entry is stamped with the current location and defaulted before
    /// upload. An empty body is a silent no-op.
    ///
    /// # Errors
    ///
    /// - `SyncError::NotReady` before authentication (no request is sent)
    /// - `SyncError::Crypto` if the entry cannot be encrypted
    /// - `SyncError::Unreachable` / `SyncError::Rejected` on transport failures
    pub async fn save(
        &self,
        date: NaiveDate,
        entry: &JournalEntry,
    ) -> Result<SaveOutcome, SyncError> {
        let token = self.token()?;

        if !is_same_day(date, self.today()) {
            debug!("Skipping save for past day {}", date_key(date));
            return Ok(SaveOutcome::Skipped(SkipReason::NotToday));
        }

        let mut stamped = entry.clone();
        stamped.location = Some(self.location.get());
        if !stamped.has_body() {
            debug!("Skipping save with empty body");
            return Ok(SaveOutcome::Skipped(SkipReason::EmptyBody));
        }
        let payload = stamped.with_save_defaults();

        let plaintext = serde_json::to_vec(&payload)
            .map_err(|e| SyncError::Crypto(CryptoError::EncryptionFailed(e.to_string())))?;
        let private = self.vault.private_key().map_err(SyncError::Crypto)?;
        let public = self.vault.public_key().map_err(SyncError::Crypto)?;
        let sealed = codec::encrypt_and_sign(plaintext, public, private)
            .await
            .map_err(SyncError::Crypto)?;

        self.remote
            .save_entry(&token, &sealed.ciphertext, &sealed.signature)
            .await?;

        info!("Entry saved for {}", date_key(date));
        Ok(SaveOutcome::Saved)
    }
}
