//! Two-stage challenge/response handshake.
//!
//! ```text
//! Idle -> Stage1Requested -> Stage2Sent -> Authenticated
//!   \__________\_________________\______-> Failed
//! ```
//!
//! Stage 1 fetches a server-side salt. Stage 2 signs
//! `serverSideSalt + clientSideSalt` and submits it with both salts; the
//! server answers `"null"` or today's entry as armored ciphertext, which must
//! verify before the session is considered authenticated. Any failure is
//! terminal: there is no retry.

use tracing::{debug, info, warn};

use crate::crypto::{codec, KeyVault};
use crate::errors::{AuthError, CryptoError};
use crate::journal::JournalEntry;
use crate::remote::{is_no_data, RemoteStore};

/// Progress of the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    Stage1Requested,
    Stage2Sent,
    Authenticated,
    Failed,
}

impl HandshakeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, HandshakeState::Authenticated | HandshakeState::Failed)
    }
}

/// Drives one handshake against the diary server.
pub struct Handshake<'a> {
    remote: &'a RemoteStore,
    state: HandshakeState,
}

impl<'a> Handshake<'a> {
    pub fn new(remote: &'a RemoteStore) -> Self {
        Self {
            remote,
            state: HandshakeState::Idle,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Runs the handshake to a terminal state.
    ///
    /// On success the vault holds the server-side salt and reports
    /// `is_auth_finished() == true`; the returned entry is today's data when
    /// the server had any.
    ///
    /// # Errors
    ///
    /// Any error leaves the handshake in `Failed` and the vault unauthenticated.
    pub async fn run(&mut self, vault: &mut KeyVault) -> Result<Option<JournalEntry>, AuthError> {
        if self.state != HandshakeState::Idle {
            return Err(AuthError::AlreadyRan(self.state));
        }

        match self.drive(vault).await {
            Ok(entry) => {
                self.state = HandshakeState::Authenticated;
                vault.mark_authenticated();
                info!("Authenticated with diary server");
                Ok(entry)
            }
            Err(e) => {
                warn!("Handshake failed: {}", e);
                self.state = HandshakeState::Failed;
                Err(e)
            }
        }
    }

    async fn drive(&mut self, vault: &mut KeyVault) -> Result<Option<JournalEntry>, AuthError> {
        let private = vault.private_key()?;
        let public = vault.public_key()?;

        self.state = HandshakeState::Stage1Requested;
        let server_side_salt = self
            .remote
            .request_challenge()
            .await
            .map_err(|source| AuthError::Remote {
                stage: "stage 1",
                source,
            })?;
        vault.set_server_side_salt(server_side_salt.clone());

        let challenge = format!("{}{}", server_side_salt, vault.client_side_salt());
        let signature = codec::sign(challenge.into_bytes(), private.clone()).await?;

        self.state = HandshakeState::Stage2Sent;
        let body = self
            .remote
            .submit_challenge(&server_side_salt, vault.client_side_salt(), &signature)
            .await
            .map_err(|source| AuthError::Remote {
                stage: "stage 2",
                source,
            })?;

        if is_no_data(&body) {
            debug!("Server holds no entry for today");
            return Ok(None);
        }

        let plaintext = codec::decrypt_and_verify(body, public, private)
            .await
            .map_err(|e| match e {
                CryptoError::TaskFailed(_) => AuthError::Crypto(e),
                _ => AuthError::Verify,
            })?;
        let entry: JournalEntry =
            serde_json::from_slice(&plaintext).map_err(|_| AuthError::Verify)?;

        debug!("Server returned today's entry");
        Ok(Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_terminal_states() {
        assert!(HandshakeState::Authenticated.is_terminal());
        assert!(HandshakeState::Failed.is_terminal());
        assert!(!HandshakeState::Idle.is_terminal());
        assert!(!HandshakeState::Stage1Requested.is_terminal());
        assert!(!HandshakeState::Stage2Sent.is_terminal());
    }

    #[tokio::test]
    async fn test_locked_vault_fails_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let stage1 = server
            .mock("GET", "/auth")
            .expect(0)
            .create_async()
            .await;

        let remote = RemoteStore::new(server.url(), Duration::from_secs(5)).unwrap();
        let mut vault = KeyVault::new();
        let mut handshake = Handshake::new(&remote);

        let result = handshake.run(&mut vault).await;
        assert!(matches!(
            result,
            Err(AuthError::Crypto(CryptoError::NotUnlocked))
        ));
        assert_eq!(handshake.state(), HandshakeState::Failed);
        assert!(!vault.is_auth_finished());
        stage1.assert_async().await;
    }
}
