/*!
# Diary Client

A client for a daily journal whose server only ever sees ciphertext. Entries
are encrypted to the user's own key and signed before upload, and every entry
read back is verified against the same key.

## Core Features

- Unlock a passphrase-protected private key, persisted locally still sealed
- Challenge/response handshake proving key possession to the server
- Fetch and verify the entry for any past day
- Edit and save today's entry, stamped with a best-effort location

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `crypto`: Key material, the session key vault and the encrypt/sign codec
- `remote`: HTTP transport for the diary server protocol
- `auth`: The two-stage handshake
- `journal`: Entry model, date identity and fetch/save
- `session`: Immutable session snapshots and the UI-facing controller
- `bootstrap`: Ordered startup that wires everything together
- `cli`, `config`, `errors`: Command line, configuration and error handling

## Usage Example

```rust,no_run
use std::sync::Arc;
use diary_client::{bootstrap, Config, TerminalInteraction};

#[tokio::main]
async fn main() -> diary_client::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let journal = bootstrap::start(&config, Arc::new(TerminalInteraction)).await?;
    journal.update_text("A quiet day.");
    journal.manually_save().await;
    Ok(())
}
```
*/

/// Protocol message flows for authentication
pub mod auth;
/// Session startup orchestration
pub mod bootstrap;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Key material and cryptographic operations
pub mod crypto;
/// Error types and utilities for error handling
pub mod errors;
/// Journal entries and their synchronization
pub mod journal;
/// Background geolocation lookup
pub mod location;
/// User interaction seam
pub mod prompt;
/// HTTP transport to the diary server
pub mod remote;
/// Session state and controller
pub mod session;
/// Local persistence of the sealed private key
pub mod storage;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use journal::JournalEntry;
pub use prompt::{Interaction, Notice, TerminalInteraction};
pub use session::{Journal, SessionState};
