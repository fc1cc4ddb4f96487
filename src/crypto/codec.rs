//! Encrypt-sign and decrypt-verify over the key material.
//!
//! The synchronous functions do the work and are pure with respect to
//! external state. The async wrappers move them onto the blocking pool so
//! CPU-bound crypto never stalls other pending tasks.
//!
//! Payload layout: the plaintext is wrapped in a signed envelope
//! (`{data, signature}`, Ed25519 over the plaintext), encrypted to the
//! recipient and age armored. The server additionally receives a detached
//! signature over `base64(armored ciphertext)` so it can check provenance
//! without decrypting.

use std::io::{Read, Write};
use std::iter;
use std::sync::Arc;

use age::armor::{ArmoredReader, ArmoredWriter, Format};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signature, Signer, Verifier};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::constants::SIGNATURE_ARMOR_LABEL;
use crate::crypto::armor;
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::errors::CryptoError;

/// Armored ciphertext plus a detached signature over its base64 encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    /// age-armored ciphertext
    pub ciphertext: String,
    /// Armored Ed25519 signature over `base64(ciphertext)`
    pub signature: String,
}

#[derive(Serialize, Deserialize)]
struct SignedEnvelope {
    data: String,
    signature: String,
}

/// Creates an armored detached signature over `message`.
pub fn sign_message(message: &[u8], signer: &PrivateKey) -> String {
    let signature = signer.signing.sign(message);
    armor::armor(SIGNATURE_ARMOR_LABEL, &signature.to_bytes())
}

/// Verifies an armored detached signature over `message`.
///
/// # Errors
///
/// Returns `CryptoError::VerifyFailed` if the signature is malformed or does not match.
pub fn verify_message(
    message: &[u8],
    armored_signature: &str,
    signer: &PublicKey,
) -> Result<(), CryptoError> {
    let bytes =
        armor::dearmor(SIGNATURE_ARMOR_LABEL, armored_signature).ok_or(CryptoError::VerifyFailed)?;
    let signature = Signature::from_slice(&bytes).map_err(|_| CryptoError::VerifyFailed)?;
    signer
        .verifying
        .verify(message, &signature)
        .map_err(|_| CryptoError::VerifyFailed)
}

/// Encrypts `plaintext` for `recipient` and signs it with `signer`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if age fails to encrypt or armor the payload.
pub fn seal_payload(
    plaintext: &[u8],
    recipient: &PublicKey,
    signer: &PrivateKey,
) -> Result<SealedPayload, CryptoError> {
    let envelope = SignedEnvelope {
        data: STANDARD.encode(plaintext),
        signature: STANDARD.encode(signer.signing.sign(plaintext).to_bytes()),
    };
    let inner = Zeroizing::new(
        serde_json::to_vec(&envelope).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?,
    );

    let encryptor =
        age::Encryptor::with_recipients(iter::once(&recipient.encryption as &dyn age::Recipient))
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut armored = Vec::new();
    {
        let output = ArmoredWriter::wrap_output(&mut armored, Format::AsciiArmor)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        let mut writer = encryptor
            .wrap_output(output)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        writer
            .write_all(&inner)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        writer
            .finish()
            .and_then(|output| output.finish())
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    }
    let ciphertext =
        String::from_utf8(armored).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let signature = sign_message(STANDARD.encode(ciphertext.as_bytes()).as_bytes(), signer);

    Ok(SealedPayload {
        ciphertext,
        signature,
    })
}

/// Decrypts `ciphertext` with `recipient` and verifies it was signed by `signer`.
///
/// # Errors
///
/// Returns `CryptoError::VerifyFailed` for every failure: bad armor,
/// undecryptable data, malformed envelope or a signature from another key.
pub fn open_payload(
    ciphertext: &str,
    signer: &PublicKey,
    recipient: &PrivateKey,
) -> Result<Vec<u8>, CryptoError> {
    let decryptor = age::Decryptor::new(ArmoredReader::new(ciphertext.as_bytes()))
        .map_err(|_| CryptoError::VerifyFailed)?;
    let mut reader = decryptor
        .decrypt(iter::once(&recipient.encryption as &dyn age::Identity))
        .map_err(|_| CryptoError::VerifyFailed)?;

    let mut inner = Zeroizing::new(Vec::new());
    reader
        .read_to_end(&mut inner)
        .map_err(|_| CryptoError::VerifyFailed)?;

    let envelope: SignedEnvelope =
        serde_json::from_slice(&inner).map_err(|_| CryptoError::VerifyFailed)?;
    let data = STANDARD
        .decode(envelope.data.as_bytes())
        .map_err(|_| CryptoError::VerifyFailed)?;
    let signature_bytes = STANDARD
        .decode(envelope.signature.as_bytes())
        .map_err(|_| CryptoError::VerifyFailed)?;
    let signature =
        Signature::from_slice(&signature_bytes).map_err(|_| CryptoError::VerifyFailed)?;

    signer
        .verifying
        .verify(&data, &signature)
        .map_err(|_| CryptoError::VerifyFailed)?;

    Ok(data)
}

async fn run_blocking<T, F>(job: F) -> Result<T, CryptoError>
where
    F: FnOnce() -> Result<T, CryptoError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| CryptoError::TaskFailed(e.to_string()))?
}

/// Async form of [`seal_payload`].
pub async fn encrypt_and_sign(
    plaintext: Vec<u8>,
    recipient: Arc<PublicKey>,
    signer: Arc<PrivateKey>,
) -> Result<SealedPayload, CryptoError> {
    let plaintext = Zeroizing::new(plaintext);
    run_blocking(move || seal_payload(&plaintext, &recipient, &signer)).await
}

/// Async form of [`open_payload`].
pub async fn decrypt_and_verify(
    ciphertext: String,
    signer: Arc<PublicKey>,
    recipient: Arc<PrivateKey>,
) -> Result<Vec<u8>, CryptoError> {
    run_blocking(move || open_payload(&ciphertext, &signer, &recipient)).await
}

/// Async form of [`sign_message`].
pub async fn sign(message: Vec<u8>, signer: Arc<PrivateKey>) -> Result<String, CryptoError> {
    run_blocking(move || Ok(sign_message(&message, &signer))).await
}
