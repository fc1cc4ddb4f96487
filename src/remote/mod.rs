//! HTTP client for the diary server.
//!
//! The server is an opaque endpoint that stores ciphertext and detached
//! signatures. This module only moves strings over the wire; all decisions
//! about what a body means live in `auth` and `journal`.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::constants::{
    AUTH_PATH, DATA_PATH_PREFIX, FORM_DATA, FORM_SIGNATURE, HEADER_CLIENT_SALT,
    HEADER_SERVER_SALT, HEADER_TOKEN, NO_DATA_MARKER, SAVE_PATH,
};
use crate::errors::{AppError, AppResult, RemoteError};

/// Whether a response body is the server's literal "nothing here" marker.
pub fn is_no_data(body: &str) -> bool {
    body.trim() == NO_DATA_MARKER
}

/// Client for the four diary server endpoints.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: String,
    client: Client,
}

impl RemoteStore {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the diary server (e.g., "http://127.0.0.1:8080")
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The underlying HTTP client, shared with other lookups.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Stage 1: `GET /auth`, returning the server-side salt.
    pub async fn request_challenge(&self) -> Result<String, RemoteError> {
        debug!("Requesting handshake challenge");
        let url = format!("{}{}", self.base_url, AUTH_PATH);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(RemoteError::Unreachable)?;

        read_body(response).await
    }

    /// Stage 2: `POST /auth` with both salts and the challenge signature.
    ///
    /// Returns `"null"` or today's armored entry.
    pub async fn submit_challenge(
        &self,
        server_side_salt: &str,
        client_side_salt: &str,
        signature: &str,
    ) -> Result<String, RemoteError> {
        debug!("Submitting handshake signature");
        let url = format!("{}{}", self.base_url, AUTH_PATH);

        let response = self
            .client
            .post(&url)
            .header(HEADER_CLIENT_SALT, client_side_salt)
            .header(HEADER_SERVER_SALT, server_side_salt)
            .form(&[(FORM_SIGNATURE, signature)])
            .send()
            .await
            .map_err(RemoteError::Unreachable)?;

        read_body(response).await
    }

    /// `GET /data/{date_path}` with the session token.
    pub async fn fetch_entry(&self, date_path: &str, token: &str) -> Result<String, RemoteError> {
        debug!("Fetching entry for {}", date_path);
        let url = format!("{}{}{}", self.base_url, DATA_PATH_PREFIX, date_path);

        let response = self
            .client
            .get(&url)
            .header(HEADER_TOKEN, token)
            .send()
            .await
            .map_err(RemoteError::Unreachable)?;

        read_body(response).await
    }

    /// `POST /save` with the ciphertext and its detached signature.
    pub async fn save_entry(
        &self,
        token: &str,
        ciphertext: &str,
        signature: &str,
    ) -> Result<(), RemoteError> {
        debug!("Uploading entry");
        let url = format!("{}{}", self.base_url, SAVE_PATH);

        let response = self
            .client
            .post(&url)
            .header(HEADER_TOKEN, token)
            .form(&[(FORM_DATA, ciphertext), (FORM_SIGNATURE, signature)])
            .send()
            .await
            .map_err(RemoteError::Unreachable)?;

        read_body(response).await.map(|_| ())
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Rejected {
            status: status.as_u16(),
        });
    }
    response.text().await.map_err(RemoteError::Unreachable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_marker() {
        assert!(is_no_data("null"));
        assert!(is_no_data("null\n"));
        assert!(!is_no_data("nullable"));
        assert!(!is_no_data(""));
        assert!(!is_no_data("-----BEGIN AGE ENCRYPTED FILE-----"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let remote = RemoteStore::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(remote.base_url, "http://localhost:8080");
    }
}
