
use std::sync::Arc;

use age::secrecy::SecretString;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use diary_client::crypto::{
    decrypt_and_verify, encrypt_and_sign, sign, verify_message, KeyVault, PrivateKey, PublicKey,
};
use diary_client::errors::CryptoError;
use test_helpers::{sealed_key, TEST_PASSPHRASE};

#[tokio::test]
async fn test_vault_unlock_then_round_trip() {
    let (_key, blob) = sealed_key();
    let mut vault = KeyVault::new();
    vault
        .unlock(&blob, SecretString::from(TEST_PASSPHRASE.to_string()))
        .await
        .unwrap();

    let private = vault.private_key().unwrap();
    let public = vault.public_key().unwrap();

    let sealed = encrypt_and_sign(b"{\"body\":\"hi\"}".to_vec(), public.clone(), private.clone())
        .await
        .unwrap();
    let opened = decrypt_and_verify(sealed.ciphertext.clone(), public.clone(), private)
        .await
        .unwrap();
    assert_eq!(opened, b"{\"body\":\"hi\"}");

    let encoded = STANDARD.encode(sealed.ciphertext.as_bytes());
    verify_message(encoded.as_bytes(), &sealed.signature, &public).unwrap();
}

#[tokio::test]
async fn test_failed_unlock_leaves_vault_locked() {
    let (_key, blob) = sealed_key();
    let mut vault = KeyVault::new();

    let wrong = vault
        .unlock(&blob, SecretString::from("wrong".to_string()))
        .await;
    assert!(matches!(wrong, Err(CryptoError::DecryptionFailed)));

    let garbage = vault
        .unlock("not a key", SecretString::from(TEST_PASSPHRASE.to_string()))
        .await;
    assert!(matches!(garbage, Err(CryptoError::DecryptionFailed)));

    assert!(!vault.is_unlocked());
}

#[tokio::test]
async fn test_signature_from_exported_public_key() {
    let key = Arc::new(PrivateKey::generate());
    let exported = key.public().to_armored().unwrap();
    let imported = PublicKey::from_armored(&exported).unwrap();

    let signature = sign(b"salt-and-salt".to_vec(), key.clone()).await.unwrap();

    verify_message(b"salt-and-salt", &signature, &imported).unwrap();
    assert!(matches!(
        verify_message(b"salt-and-pepper", &signature, &imported),
        Err(CryptoError::VerifyFailed)
    ));
}

#[tokio::test]
async fn test_payload_for_someone_else_cannot_be_opened() {
    let alice = Arc::new(PrivateKey::generate());
    let bob = Arc::new(PrivateKey::generate());

    let sealed = encrypt_and_sign(
        b"secret".to_vec(),
        Arc::new(bob.public()),
        alice.clone(),
    )
    .await
    .unwrap();

    let result = decrypt_and_verify(sealed.ciphertext, Arc::new(alice.public()), alice).await;
    assert!(matches!(result, Err(CryptoError::VerifyFailed)));
}
