//! Best-effort geolocation for stamping today's entry.
//!
//! The lookup runs in the background and never fails startup. Until it
//! resolves the location reads `"Unknown"`; a failed lookup stores `"unknown"`.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::Client;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::constants::{FAILED_LOCATION, UNKNOWN_LOCATION};

/// Shared, replaceable location string.
#[derive(Debug, Clone)]
pub struct LocationCell(Arc<RwLock<String>>);

impl Default for LocationCell {
    fn default() -> Self {
        Self::new(UNKNOWN_LOCATION)
    }
}

impl LocationCell {
    pub fn new(initial: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(initial.into())))
    }

    pub fn get(&self) -> String {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, location: impl Into<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = location.into();
    }
}

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    country: Option<String>,
    region: Option<String>,
    city: Option<String>,
}

impl GeoIpResponse {
    fn describe(&self) -> String {
        format!(
            "{} {} {}",
            self.country.as_deref().unwrap_or(UNKNOWN_LOCATION),
            self.region.as_deref().unwrap_or(""),
            self.city.as_deref().unwrap_or("")
        )
    }
}

/// Looks up the current location, returning `"unknown"` on any failure.
pub async fn lookup(client: &Client, url: &str) -> String {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Geolocation lookup failed: {}", e);
            return FAILED_LOCATION.to_string();
        }
    };

    match response.json::<GeoIpResponse>().await {
        Ok(geo) => geo.describe(),
        Err(e) => {
            warn!("Geolocation response unreadable: {}", e);
            FAILED_LOCATION.to_string()
        }
    }
}

/// Starts the lookup in the background, writing the result into `cell`.
///
/// Returns `None` when no lookup URL is configured.
pub fn spawn_lookup(
    client: Client,
    url: Option<String>,
    cell: LocationCell,
) -> Option<JoinHandle<()>> {
    let url = url?;
    Some(tokio::spawn(async move {
        let location = lookup(&client, &url).await;
        debug!("Geolocation resolved");
        cell.set(location);
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_defaults_to_unknown() {
        assert_eq!(LocationCell::default().get(), "Unknown");
    }

    #[test]
    fn test_cell_is_shared_between_clones() {
        let cell = LocationCell::default();
        let clone = cell.clone();
        clone.set("Earth");
        assert_eq!(cell.get(), "Earth");
    }

    #[test]
    fn test_describe_full_response() {
        let geo = GeoIpResponse {
            country: Some("Japan".to_string()),
            region: Some("Tokyo".to_string()),
            city: Some("Shibuya".to_string()),
        };
        assert_eq!(geo.describe(), "Japan Tokyo Shibuya");
    }

    #[test]
    fn test_describe_missing_fields() {
        let geo: GeoIpResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(geo.describe(), "Unknown  ");
    }

    #[tokio::test]
    async fn test_lookup_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/geoip")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"country":"France","region":"IDF","city":"Paris"}"#)
            .create_async()
            .await;

        let location = lookup(&Client::new(), &format!("{}/geoip", server.url())).await;
        assert_eq!(location, "France IDF Paris");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lookup_failure_yields_placeholder() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/geoip")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let location = lookup(&Client::new(), &format!("{}/geoip", server.url())).await;
        assert_eq!(location, "unknown");
    }

    #[tokio::test]
    async fn test_spawn_lookup_disabled_without_url() {
        assert!(spawn_lookup(Client::new(), None, LocationCell::default()).is_none());
    }
}
