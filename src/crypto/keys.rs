//! Key generation and the passphrase-sealed private key blob.
//!
//! A private key is an age X25519 identity (decryption) paired with an
//! Ed25519 signing key. It only ever leaves memory sealed with the user's
//! passphrase as an armored age file. The public half is exported as a
//! `DIARY PUBLIC KEY` block for registration with the server.

use std::fmt;
use std::io::{Read, Write};
use std::iter;

use age::armor::{ArmoredReader, ArmoredWriter, Format};
use age::secrecy::{ExposeSecret, SecretString};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::constants::{KEY_FORMAT_VERSION, PUBLIC_KEY_ARMOR_LABEL, REDACTED_PLACEHOLDER};
use crate::crypto::armor;
use crate::errors::CryptoError;

/// Serialized form of the private key, only ever held inside the sealed blob.
#[derive(Serialize, Deserialize)]
struct SecretKeyMaterial {
    version: u8,
    encryption: String,
    signing: String,
}

impl Drop for SecretKeyMaterial {
    fn drop(&mut self) {
        self.encryption.zeroize();
        self.signing.zeroize();
    }
}

#[derive(Serialize, Deserialize)]
struct PublicKeyMaterial {
    version: u8,
    encryption: String,
    verifying: String,
}

/// An unlocked private key.
pub struct PrivateKey {
    pub(crate) encryption: age::x25519::Identity,
    pub(crate) signing: SigningKey,
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("encryption", &REDACTED_PLACEHOLDER)
            .field("signing", &REDACTED_PLACEHOLDER)
            .finish()
    }
}

impl PrivateKey {
    /// Generates a fresh key pair from the operating system RNG.
    pub fn generate() -> Self {
        let mut seed = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut *seed);

        Self {
            encryption: age::x25519::Identity::generate(),
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// Derives the public half of this key.
    pub fn public(&self) -> PublicKey {
        PublicKey {
            encryption: self.encryption.to_public(),
            verifying: self.signing.verifying_key(),
        }
    }

    /// Seals the key with a passphrase into an armored age file.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EncryptionFailed` if age fails to encrypt or armor the blob.
    pub fn seal(&self, passphrase: &SecretString) -> Result<String, CryptoError> {
        let material = SecretKeyMaterial {
            version: KEY_FORMAT_VERSION,
            encryption: self.encryption.to_string().expose_secret().to_string(),
            signing: STANDARD.encode(self.signing.to_bytes()),
        };
        let plaintext = Zeroizing::new(
            serde_json::to_vec(&material)
                .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?,
        );

        let encryptor = age::Encryptor::with_user_passphrase(SecretString::from(
            passphrase.expose_secret().to_string(),
        ));

        let mut armored = Vec::new();
        {
            let output = ArmoredWriter::wrap_output(&mut armored, Format::AsciiArmor)
                .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
            let mut writer = encryptor
                .wrap_output(output)
                .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
            writer
                .write_all(&plaintext)
                .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
            writer
                .finish()
                .and_then(|output| output.finish())
                .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        }

        String::from_utf8(armored).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    /// Opens a sealed key blob with its passphrase.
    ///
    /// # Errors
    ///
    /// - `CryptoError::DecryptionFailed` if the passphrase is wrong
    /// - `CryptoError::InvalidKey` if the blob is not a sealed diary key
    pub fn unseal(armored: &str, passphrase: &SecretString) -> Result<Self, CryptoError> {
        let decryptor = age::Decryptor::new(ArmoredReader::new(armored.as_bytes()))
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        let identity =
            age::scrypt::Identity::new(SecretString::from(passphrase.expose_secret().to_string()));
        let mut reader = decryptor
            .decrypt(iter::once(&identity as &dyn age::Identity))
            .map_err(|e| match e {
                age::DecryptError::NoMatchingKeys
                | age::DecryptError::DecryptionFailed
                | age::DecryptError::KeyDecryptionFailed => CryptoError::DecryptionFailed,
                other => CryptoError::InvalidKey(other.to_string()),
            })?;

        let mut plaintext = Zeroizing::new(Vec::new());
        reader
            .read_to_end(&mut plaintext)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        let material: SecretKeyMaterial = serde_json::from_slice(&plaintext)
            .map_err(|e| CryptoError::InvalidKey(format!("malformed key material: {}", e)))?;
        if material.version != KEY_FORMAT_VERSION {
            return Err(CryptoError::InvalidKey(format!(
                "unsupported key version {}",
                material.version
            )));
        }

        let encryption = material
            .encryption
            .parse::<age::x25519::Identity>()
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        let seed = Zeroizing::new(
            STANDARD
                .decode(material.signing.as_bytes())
                .map_err(|e| CryptoError::InvalidKey(e.to_string()))?,
        );
        let seed: [u8; 32] = seed
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("signing key must be 32 bytes".to_string()))?;
        let signing = SigningKey::from_bytes(&seed);

        debug!("Private key unsealed");
        Ok(Self {
            encryption,
            signing,
        })
    }
}

/// The public half of a key pair.
#[derive(Clone)]
pub struct PublicKey {
    pub(crate) encryption: age::x25519::Recipient,
    pub(crate) verifying: VerifyingKey,
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl PublicKey {
    /// Exports the key as a `DIARY PUBLIC KEY` armored block.
    pub fn to_armored(&self) -> Result<String, CryptoError> {
        let material = PublicKeyMaterial {
            version: KEY_FORMAT_VERSION,
            encryption: self.encryption.to_string(),
            verifying: STANDARD.encode(self.verifying.to_bytes()),
        };
        let json = serde_json::to_vec(&material)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        Ok(armor::armor(PUBLIC_KEY_ARMOR_LABEL, &json))
    }

    /// Parses a key exported with [`PublicKey::to_armored`].
    pub fn from_armored(text: &str) -> Result<Self, CryptoError> {
        let json = armor::dearmor(PUBLIC_KEY_ARMOR_LABEL, text)
            .ok_or_else(|| CryptoError::InvalidKey("not a diary public key".to_string()))?;
        let material: PublicKeyMaterial =
            serde_json::from_slice(&json).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        let encryption = material
            .encryption
            .parse::<age::x25519::Recipient>()
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let verifying: [u8; 32] = STANDARD
            .decode(material.verifying.as_bytes())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("verifying key must be 32 bytes".to_string()))?;
        let verifying = VerifyingKey::from_bytes(&verifying)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        Ok(Self {
            encryption,
            verifying,
        })
    }

    /// Human-readable fingerprint: BLAKE3 over both public keys, truncated to
    /// 20 bytes and hex-encoded in groups of 4.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.encryption.to_string().as_bytes());
        hasher.update(self.verifying.as_bytes());
        let hex = hasher.finalize().to_hex();

        hex.as_str()[..40]
            .as_bytes()
            .chunks(4)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
