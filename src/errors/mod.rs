//! Error handling utilities for the diary client.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Errors are split by concern: key handling and cryptography (`CryptoError`),
//! raw transport (`RemoteError`), the authentication handshake (`AuthError`) and
//! journal synchronisation (`SyncError`). Handshake and key failures are fatal
//! to a session; sync failures are recoverable and reported to the user.

use thiserror::Error;

use crate::auth::HandshakeState;

/// Represents specific error cases that can occur during cryptographic operations.
///
/// # Examples
///
/// ```
/// use diary_client::errors::CryptoError;
///
/// let error = CryptoError::NotUnlocked;
/// assert!(format!("{}", error).contains("not unlocked"));
/// ```
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material was requested before the vault was unlocked.
    #[error("Private key is not unlocked yet")]
    NotUnlocked,

    /// The passphrase did not open the stored private key.
    #[error("Unable to decrypt private key. Check the passphrase and try again.")]
    DecryptionFailed,

    /// The private key blob could not be parsed.
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    /// A received payload failed decryption or signature verification.
    ///
    /// Both causes are reported identically.
    #[error("Payload failed verification")]
    VerifyFailed,

    /// Error during encryption or signing.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// An empty passphrase was entered.
    #[error("Passphrase cannot be empty")]
    EmptyPassphrase,

    /// The two passphrases entered during key generation differ.
    #[error("Passphrases do not match")]
    PassphraseMismatch,

    /// Reading the passphrase from the terminal failed.
    #[error("Failed to read passphrase: {0}")]
    PassphrasePrompt(String),

    /// The blocking task running a crypto operation did not complete.
    #[error("Crypto task failed: {0}")]
    TaskFailed(String),
}

/// Transport-level failures talking to the diary server.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The server could not be reached or the response body could not be read.
    #[error("Diary server unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Diary server rejected the request with HTTP {status}")]
    Rejected {
        /// HTTP status code returned by the server
        status: u16,
    },
}

/// Failures of the two-stage authentication handshake. All of them are fatal.
///
/// # Examples
///
/// ```
/// use diary_client::errors::AuthError;
///
/// let error = AuthError::Verify;
/// assert!(format!("{}", error).contains("Unable to auth"));
/// ```
#[derive(Debug, Error)]
pub enum AuthError {
    /// A handshake request failed at the transport or status level.
    #[error("Authentication {stage} failed: {source}")]
    Remote {
        /// Which stage of the handshake failed
        stage: &'static str,
        /// The underlying transport error
        #[source]
        source: RemoteError,
    },

    /// Today's entry returned by stage 2 failed verification.
    #[error("Unable to auth you: server payload failed verification")]
    Verify,

    /// Key material was unavailable or signing the challenge failed.
    #[error("Unable to sign challenge: {0}")]
    Crypto(#[from] CryptoError),

    /// The handshake was started from a state other than `Idle`.
    #[error("Handshake already ran (state: {0:?})")]
    AlreadyRan(HandshakeState),
}

/// Recoverable failures of journal fetch and save.
///
/// # Examples
///
/// ```
/// use diary_client::errors::SyncError;
///
/// let error = SyncError::NotReady;
/// assert!(format!("{}", error).contains("not finished"));
/// ```
#[derive(Debug, Error)]
pub enum SyncError {
    /// Called before the handshake reached `Authenticated`.
    #[error("Authentication has not finished yet")]
    NotReady,

    /// The server could not be reached.
    #[error("Diary server unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Diary server rejected the request with HTTP {status}")]
    Rejected {
        /// HTTP status code returned by the server
        status: u16,
    },

    /// The returned payload failed decryption or verification.
    #[error("Received journal data is corrupt")]
    Corrupt,

    /// Encrypting the entry for upload failed.
    #[error("Unable to prepare entry: {0}")]
    Crypto(#[source] CryptoError),
}

impl From<RemoteError> for SyncError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::Unreachable(source) => SyncError::Unreachable(source),
            RemoteError::Rejected { status } => SyncError::Rejected { status },
        }
    }
}

/// Represents all possible errors that can occur in the diary client.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use diary_client::errors::AppError;
///
/// let error = AppError::Config("Missing server URL".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing server URL");
/// ```
///
/// Converting from an IO error:
/// ```
/// use diary_client::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem or terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors related to key handling and cryptographic operations.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Errors from the authentication handshake.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Errors from journal fetch or save.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use diary_client::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("Invalid configuration".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: Invalid configuration"
        );

        let crypto_error = AppError::Crypto(CryptoError::DecryptionFailed);
        assert!(format!("{}", crypto_error).contains("Cryptographic error"));
        assert!(format!("{}", crypto_error).contains("passphrase"));

        let auth_error = AppError::Auth(AuthError::Verify);
        assert!(format!("{}", auth_error).contains("Authentication error"));
    }

    #[test]
    fn test_verify_failure_does_not_leak_cause() {
        let message = CryptoError::VerifyFailed.to_string();
        assert_eq!(message, "Payload failed verification");
        assert_eq!(SyncError::Corrupt.to_string(), "Received journal data is corrupt");
    }

    #[test]
    fn test_remote_rejection_maps_to_sync_rejection() {
        let sync: SyncError = RemoteError::Rejected { status: 403 }.into();
        match sync {
            SyncError::Rejected { status } => assert_eq!(status, 403),
            other => panic!("Expected SyncError::Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_auth_error_from_crypto_error() {
        let auth: AuthError = CryptoError::NotUnlocked.into();
        assert!(matches!(auth, AuthError::Crypto(CryptoError::NotUnlocked)));
        assert!(auth.to_string().contains("not unlocked"));
    }

    #[test]
    fn test_already_ran_names_state() {
        let error = AuthError::AlreadyRan(HandshakeState::Authenticated);
        assert!(error.to_string().contains("Authenticated"));
    }
}
