//! Ordered session startup.
//!
//! Bootstrap is the only place that owns the [`KeyVault`] mutably. Once the
//! handshake has run, the vault is frozen behind an `Arc` and handed to
//! [`JournalSync`].

use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::auth::Handshake;
use crate::config::Config;
use crate::constants::TRACING_ROOT_SPAN_NAME;
use crate::crypto::KeyVault;
use crate::errors::AppResult;
use crate::journal::{local_clock, Clock, JournalSync};
use crate::location::{spawn_lookup, LocationCell};
use crate::prompt::Interaction;
use crate::remote::RemoteStore;
use crate::session::{Journal, SessionState};
use crate::storage::KeyStorage;

/// Starts a session using the local calendar.
///
/// # Errors
///
/// Every error is fatal for the session: a missing or unreadable key, a
/// wrong passphrase, or a failed handshake.
pub async fn start<I: Interaction>(config: &Config, interaction: Arc<I>) -> AppResult<Journal<I>> {
    start_with_clock(config, interaction, local_clock()).await
}

/// Starts a session with an explicit notion of "today".
pub async fn start_with_clock<I: Interaction>(
    config: &Config,
    interaction: Arc<I>,
    clock: Clock,
) -> AppResult<Journal<I>> {
    let correlation_id = Uuid::new_v4();
    let span = info_span!(TRACING_ROOT_SPAN_NAME, correlation_id = %correlation_id);
    run(config, interaction, clock).instrument(span).await
}

async fn run<I: Interaction>(
    config: &Config,
    interaction: Arc<I>,
    clock: Clock,
) -> AppResult<Journal<I>> {
    let remote = Arc::new(RemoteStore::new(
        config.server_url.clone(),
        config.timeout(),
    )?);

    let location = LocationCell::default();
    if spawn_lookup(
        remote.http_client().clone(),
        config.geoip_url.clone(),
        location.clone(),
    )
    .is_none()
    {
        debug!("Geolocation lookup disabled");
    }

    let storage = KeyStorage::in_dir(&config.state_dir);
    let (armored_key, freshly_supplied) = match storage.load()? {
        Some(blob) => {
            debug!("Loaded stored private key");
            (blob, false)
        }
        None => (interaction.request_private_key()?, true),
    };

    let passphrase = interaction.request_passphrase()?;
    let mut vault = KeyVault::new();
    vault.unlock(&armored_key, passphrase).await?;

    if freshly_supplied {
        storage.store(&armored_key)?;
        info!("Private key stored for future sessions");
    }

    let mut handshake = Handshake::new(&remote);
    let seed = handshake.run(&mut vault).await?;

    let today = clock();
    let initial = SessionState::initial(today, seed);
    let sync = JournalSync::new(Arc::new(vault), remote, location, clock);

    info!("Session ready");
    Ok(Journal::new(sync, initial, interaction))
}
