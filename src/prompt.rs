//! User interaction seam.
//!
//! The core never renders anything itself. Everything it needs from a user
//! (the key blob, the passphrase, a save confirmation) and everything it
//! reports back goes through [`Interaction`].

use std::env;
use std::fmt;
use std::io::{self, BufRead, Write};

use age::secrecy::SecretString;
use chrono::NaiveDate;
use tracing::debug;

use crate::constants::ENV_VAR_PASSPHRASE;
use crate::errors::{AppResult, CryptoError};
use crate::journal::date_key;

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An entry was uploaded.
    Saved(NaiveDate),
    /// Upload failed; the session continues.
    SaveFailed(String),
    /// The selected day has no stored entry.
    NoDataForDay(NaiveDate),
    /// Fetching a day failed; the session continues.
    LoadFailed,
    /// The user tried to open a day in the future.
    FutureDate,
    /// The session cannot continue and must be restarted.
    Fatal(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Saved(date) => write!(f, "Data saved for {}", date_key(*date)),
            Notice::SaveFailed(reason) => write!(f, "Failed to save data! {}", reason),
            Notice::NoDataForDay(_) => write!(f, "This day has no data yet!"),
            Notice::LoadFailed => write!(f, "Failed to load data!"),
            Notice::FutureDate => write!(f, "You cannot edit the future!"),
            Notice::Fatal(reason) => write!(f, "Error! {}", reason),
        }
    }
}

/// What the core needs from the presentation layer.
pub trait Interaction: Send + Sync + 'static {
    /// Asks for the ASCII-armored private key blob. Blocks startup.
    fn request_private_key(&self) -> AppResult<String>;

    /// Asks for the passphrase protecting the private key. Blocks startup.
    fn request_passphrase(&self) -> AppResult<SecretString>;

    /// Asks whether unsaved edits for `date` should be saved. Called from a
    /// blocking task, so it may wait on the terminal.
    fn confirm_save(&self, date: NaiveDate) -> bool;

    /// Shows a notice to the user.
    fn notify(&self, notice: &Notice);
}

/// Terminal implementation using stdin/stdout and `rpassword`.
///
/// Set `DIARY_PASSPHRASE` to bypass the interactive passphrase prompt.
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    fn read_line(prompt: &str) -> io::Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Interaction for TerminalInteraction {
    fn request_private_key(&self) -> AppResult<String> {
        println!("\nInput your private key (stored locally, still encrypted).");
        println!("Paste your ASCII-armored key, then an empty line:");

        let stdin = io::stdin();
        let mut blob = String::new();
        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() && !blob.is_empty() {
                break;
            }
            blob.push_str(&line);
            blob.push('\n');
        }
        Ok(blob)
    }

    fn request_passphrase(&self) -> AppResult<SecretString> {
        if let Ok(passphrase) = env::var(ENV_VAR_PASSPHRASE) {
            debug!("Using {} for non-interactive unlock", ENV_VAR_PASSPHRASE);
            return Ok(SecretString::from(passphrase));
        }

        let passphrase = rpassword::prompt_password("Passphrase: ")
            .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;
        if passphrase.is_empty() {
            return Err(CryptoError::EmptyPassphrase.into());
        }
        Ok(SecretString::from(passphrase))
    }

    fn confirm_save(&self, date: NaiveDate) -> bool {
        let prompt = format!("Save your data for {}? [y/N] ", date_key(date));
        match Self::read_line(&prompt) {
            Ok(answer) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }

    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Fatal(_) | Notice::SaveFailed(_) | Notice::LoadFailed => {
                eprintln!("{}", notice)
            }
            _ => println!("{}", notice),
        }
    }
}

/// Prompts for a new passphrase twice, for key generation.
///
/// Honors `DIARY_PASSPHRASE` like [`TerminalInteraction`].
///
/// # Errors
///
/// Returns `CryptoError::PassphraseMismatch` if confirmations differ and
/// `CryptoError::EmptyPassphrase` if nothing was entered.
pub fn prompt_new_passphrase() -> AppResult<SecretString> {
    if let Ok(passphrase) = env::var(ENV_VAR_PASSPHRASE) {
        if passphrase.is_empty() {
            return Err(CryptoError::EmptyPassphrase.into());
        }
        return Ok(SecretString::from(passphrase));
    }

    println!("Choose a strong passphrase to protect your private key.\n");
    let passphrase = rpassword::prompt_password("Enter passphrase: ")
        .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;
    let confirmation = rpassword::prompt_password("Confirm passphrase: ")
        .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;

    if passphrase != confirmation {
        return Err(CryptoError::PassphraseMismatch.into());
    }
    if passphrase.is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }
    Ok(SecretString::from(passphrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_messages() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        assert_eq!(
            Notice::Saved(date).to_string(),
            "Data saved for Wed Oct 14 2026"
        );
        assert_eq!(Notice::FutureDate.to_string(), "You cannot edit the future!");
        assert!(Notice::SaveFailed("HTTP 500".to_string())
            .to_string()
            .contains("HTTP 500"));
        assert_eq!(
            Notice::NoDataForDay(date).to_string(),
            "This day has no data yet!"
        );
    }
}
