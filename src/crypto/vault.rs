//! Session key vault.
//!
//! The vault holds the unlocked private key, its public half and the two
//! handshake salts. It is created once at bootstrap, mutated only while the
//! handshake runs, and then shared read-only for the rest of the session.

use std::fmt;
use std::sync::Arc;

use age::secrecy::SecretString;
use rand::{distributions::Alphanumeric, Rng};
use tracing::{debug, info};

use crate::constants::{CLIENT_SALT_LEN, REDACTED_PLACEHOLDER};
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::errors::CryptoError;

/// Holds key material and handshake state for one session.
///
/// # Example
///
/// ```
/// use diary_client::crypto::KeyVault;
///
/// let vault = KeyVault::new();
/// assert!(!vault.is_unlocked());
/// assert!(!vault.is_auth_finished());
/// assert_eq!(vault.client_side_salt().len(), 16);
/// ```
pub struct KeyVault {
    private_key: Option<Arc<PrivateKey>>,
    public_key: Option<Arc<PublicKey>>,
    client_side_salt: String,
    server_side_salt: Option<String>,
    auth_finished: bool,
}

impl fmt::Debug for KeyVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyVault")
            .field("unlocked", &self.is_unlocked())
            .field("client_side_salt", &REDACTED_PLACEHOLDER)
            .field("server_side_salt", &REDACTED_PLACEHOLDER)
            .field("auth_finished", &self.auth_finished)
            .finish()
    }
}

impl Default for KeyVault {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyVault {
    /// Creates a locked vault with a freshly generated client-side salt.
    pub fn new() -> Self {
        Self::with_client_side_salt(generate_client_side_salt())
    }

    /// Creates a locked vault with a caller-provided client-side salt.
    pub fn with_client_side_salt(client_side_salt: impl Into<String>) -> Self {
        Self {
            private_key: None,
            public_key: None,
            client_side_salt: client_side_salt.into(),
            server_side_salt: None,
            auth_finished: false,
        }
    }

    /// Unlocks the armored private key with `passphrase`.
    ///
    /// On failure the vault keeps whatever state it had before the call.
    ///
    /// # Errors
    ///
    /// - `CryptoError::DecryptionFailed` if the passphrase is wrong or the
    ///   blob is not a sealed diary key
    pub async fn unlock(
        &mut self,
        armored_key: &str,
        passphrase: SecretString,
    ) -> Result<(), CryptoError> {
        let armored_key = armored_key.to_owned();
        let key = tokio::task::spawn_blocking(move || PrivateKey::unseal(&armored_key, &passphrase))
            .await
            .map_err(|e| CryptoError::TaskFailed(e.to_string()))?
            .map_err(|e| match e {
                CryptoError::InvalidKey(reason) => {
                    debug!("Private key blob rejected: {}", reason);
                    CryptoError::DecryptionFailed
                }
                other => other,
            })?;

        self.install(key);
        Ok(())
    }

    /// Installs an already unlocked key.
    pub fn install(&mut self, key: PrivateKey) {
        let public = key.public();
        info!(fingerprint = %public.fingerprint(), "Private key unlocked");
        self.private_key = Some(Arc::new(key));
        self.public_key = Some(Arc::new(public));
    }

    /// Whether a private key has been unlocked.
    pub fn is_unlocked(&self) -> bool {
        self.private_key.is_some()
    }

    /// Returns the unlocked private key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::NotUnlocked` before a successful unlock.
    pub fn private_key(&self) -> Result<Arc<PrivateKey>, CryptoError> {
        self.private_key.clone().ok_or(CryptoError::NotUnlocked)
    }

    /// Returns the public key derived from the unlocked private key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::NotUnlocked` before a successful unlock.
    pub fn public_key(&self) -> Result<Arc<PublicKey>, CryptoError> {
        self.public_key.clone().ok_or(CryptoError::NotUnlocked)
    }

    pub fn client_side_salt(&self) -> &str {
        &self.client_side_salt
    }

    pub fn server_side_salt(&self) -> Option<&str> {
        self.server_side_salt.as_deref()
    }

    pub(crate) fn set_server_side_salt(&mut self, salt: String) {
        debug!("Server-side salt assigned");
        self.server_side_salt = Some(salt);
    }

    pub(crate) fn mark_authenticated(&mut self) {
        self.auth_finished = true;
    }

    /// The interlock every journal operation checks before touching the network.
    pub fn is_auth_finished(&self) -> bool {
        self.auth_finished
    }

    /// Value of the `x-token` header: server-side salt followed by client-side salt.
    ///
    /// Recomputed on every call; `None` until the server assigned its salt.
    pub fn auth_token(&self) -> Option<String> {
        self.server_side_salt
            .as_ref()
            .map(|server| format!("{}{}", server, self.client_side_salt))
    }
}

// TODO: decide with the server owners whether this salt needs an OsRng source.
fn generate_client_side_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CLIENT_SALT_LEN)
        .map(char::from)
        .collect()
}
