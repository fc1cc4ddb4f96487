//! Cryptographic operations for the encrypted journal.
//!
//! This module provides key handling, the in-memory key vault and the
//! encrypt-sign / decrypt-verify codec used for every payload exchanged with
//! the diary server. Encryption uses age X25519 recipients, signatures use
//! Ed25519, and everything that leaves the process is ASCII armored.
//!
//! # Module Structure
//!
//! - `armor`: Plain-text armor for signatures and public keys
//! - `keys`: Key generation and the passphrase-sealed private key blob
//! - `vault`: Session key vault holding unlocked keys and handshake salts
//! - `codec`: Encrypt/decrypt/sign/verify over the key material
//!
//! # Example
//!
//! ```no_run
//! use diary_client::crypto::{open_payload, seal_payload, PrivateKey};
//!
//! let key = PrivateKey::generate();
//! let public = key.public();
//!
//! let sealed = seal_payload(b"Secret journal entry", &public, &key)?;
//! let plaintext = open_payload(&sealed.ciphertext, &public, &key)?;
//! assert_eq!(plaintext, b"Secret journal entry");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod armor;
pub mod codec;
pub mod keys;
pub mod vault;

// Re-export commonly used types
pub use self::codec::{
    decrypt_and_verify, encrypt_and_sign, open_payload, seal_payload, sign, sign_message,
    verify_message, SealedPayload,
};
pub use self::keys::{PrivateKey, PublicKey};
pub use self::vault::KeyVault;
