
use std::fs;
use std::sync::Arc;

use tempfile::tempdir;

use diary_client::bootstrap;
use diary_client::errors::{AppError, CryptoError};
use diary_client::journal::fixed_clock;
use diary_client::storage::KeyStorage;
use diary_client::{Config, SessionState};
use test_helpers::{encrypted_entry, entry, mock_handshake, sealed_key, today, RecordingInteraction};

fn config_for(server: &mockito::ServerGuard, state_dir: &std::path::Path) -> Config {
    Config {
        server_url: server.url(),
        state_dir: state_dir.to_path_buf(),
        geoip_url: None,
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_first_run_prompts_for_key_and_persists_it() {
    let (_key, blob) = sealed_key();
    let dir = tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let (stage1, stage2) = mock_handshake(&mut server, "null").await;

    let interaction = Arc::new(RecordingInteraction::new(Some(blob.clone())));
    let journal = bootstrap::start_with_clock(
        &config_for(&server, dir.path()),
        interaction.clone(),
        fixed_clock(today()),
    )
    .await
    .unwrap();

    assert_eq!(interaction.key_requests(), 1);
    assert_eq!(
        KeyStorage::in_dir(dir.path()).load().unwrap().as_deref(),
        Some(blob.as_str())
    );
    assert!(journal.sync().is_ready());
    assert_eq!(*journal.snapshot(), SessionState::initial(today(), None));
    stage1.assert_async().await;
    stage2.assert_async().await;
}

#[tokio::test]
async fn test_stored_key_is_used_without_prompt() {
    let (_key, blob) = sealed_key();
    let dir = tempdir().unwrap();
    KeyStorage::in_dir(dir.path()).store(&blob).unwrap();

    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_handshake(&mut server, "null").await;

    let interaction = Arc::new(RecordingInteraction::new(None));
    bootstrap::start_with_clock(
        &config_for(&server, dir.path()),
        interaction.clone(),
        fixed_clock(today()),
    )
    .await
    .unwrap();

    assert_eq!(interaction.key_requests(), 0);
}

#[tokio::test]
async fn test_handshake_seed_becomes_initial_entry() {
    let (key, blob) = sealed_key();
    let seeded = entry("<p>already written</p>");
    let ciphertext = encrypted_entry(&key, &seeded);

    let dir = tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_handshake(&mut server, &ciphertext).await;

    let journal = bootstrap::start_with_clock(
        &config_for(&server, dir.path()),
        Arc::new(RecordingInteraction::new(Some(blob))),
        fixed_clock(today()),
    )
    .await
    .unwrap();

    assert_eq!(journal.snapshot().current_entry, Some(seeded));
    assert!(!journal.snapshot().edited);
}

#[tokio::test]
async fn test_wrong_passphrase_is_fatal_and_nothing_is_stored() {
    let (_key, blob) = sealed_key();
    let dir = tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let stage1 = server
        .mock("GET", "/auth")
        .expect(0)
        .create_async()
        .await;

    let interaction = RecordingInteraction::new(Some(blob)).with_passphrase("not it");
    let result = bootstrap::start_with_clock(
        &config_for(&server, dir.path()),
        Arc::new(interaction),
        fixed_clock(today()),
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::Crypto(CryptoError::DecryptionFailed))
    ));
    assert!(!dir.path().join("encrypted_private_key.asc").exists());
    stage1.assert_async().await;
}

#[tokio::test]
async fn test_failed_handshake_is_fatal() {
    let (_key, blob) = sealed_key();
    let dir = tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _stage1 = server
        .mock("GET", "/auth")
        .with_status(500)
        .create_async()
        .await;

    let result = bootstrap::start_with_clock(
        &config_for(&server, dir.path()),
        Arc::new(RecordingInteraction::new(Some(blob))),
        fixed_clock(today()),
    )
    .await;

    assert!(matches!(result, Err(AppError::Auth(_))));
    // the key unlocked, so it stays stored for the next attempt
    assert!(fs::metadata(dir.path().join("encrypted_private_key.asc")).is_ok());
}
