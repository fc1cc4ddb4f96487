//! Constants used throughout the application.
//!
//! This module contains all constants used in the diary client, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "diary-client";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Client for an end-to-end encrypted daily journal";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the diary server base URL.
pub const ENV_VAR_SERVER_URL: &str = "DIARY_SERVER_URL";
/// Environment variable for the directory holding persisted client state.
pub const ENV_VAR_DIARY_DIR: &str = "DIARY_DIR";
/// Environment variable for the geolocation lookup URL. Empty disables the lookup.
pub const ENV_VAR_GEOIP_URL: &str = "DIARY_GEOIP_URL";
/// Environment variable for the HTTP request timeout in seconds.
pub const ENV_VAR_TIMEOUT_SECS: &str = "DIARY_TIMEOUT_SECS";
/// Environment variable carrying a passphrase for non-interactive use.
pub const ENV_VAR_PASSPHRASE: &str = "DIARY_PASSPHRASE";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default server URL.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
/// Default sub-directory for client state within the user's home directory.
pub const DEFAULT_STATE_SUBDIR: &str = ".diary";
/// Default geolocation endpoint.
pub const DEFAULT_GEOIP_URL: &str = "https://api.ip.sb/geoip";
/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Persisted State
/// File name of the persisted (still encrypted) private key blob.
pub const PRIVATE_KEY_FILE_NAME: &str = "encrypted_private_key.asc";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Protocol
/// Stage 1 and stage 2 handshake endpoint.
pub const AUTH_PATH: &str = "/auth";
/// Prefix of the date-addressed entry resource.
pub const DATA_PATH_PREFIX: &str = "/data/";
/// Save endpoint.
pub const SAVE_PATH: &str = "/save";
/// Header carrying the client-side salt during stage 2.
pub const HEADER_CLIENT_SALT: &str = "x-clientside-salt";
/// Header carrying the server-side salt during stage 2.
pub const HEADER_SERVER_SALT: &str = "x-serverside-salt";
/// Header carrying `serverSideSalt + clientSideSalt` on authenticated calls.
pub const HEADER_TOKEN: &str = "x-token";
/// Form field holding a detached signature.
pub const FORM_SIGNATURE: &str = "signature";
/// Form field holding armored ciphertext.
pub const FORM_DATA: &str = "data";
/// Literal body the server sends when there is nothing to return.
pub const NO_DATA_MARKER: &str = "null";
/// Length of the client-side salt.
pub const CLIENT_SALT_LEN: usize = 16;

// Cryptographic Formats
/// Armor label for detached signatures.
pub const SIGNATURE_ARMOR_LABEL: &str = "DIARY SIGNATURE";
/// Armor label for exported public keys.
pub const PUBLIC_KEY_ARMOR_LABEL: &str = "DIARY PUBLIC KEY";
/// Version tag written into serialized key material.
pub const KEY_FORMAT_VERSION: u8 = 1;

// Journal Defaults
/// Feeling recorded when none was entered.
pub const DEFAULT_FEELING: &str = "Unknown";
/// Weather recorded when none was entered.
pub const DEFAULT_SAVE_WEATHER: &str = "sunny";
/// Weather shown on a freshly synthesized entry.
pub const PLACEHOLDER_WEATHER: &str = "Unknown";
/// Location used for days other than today and before geolocation resolves.
pub const UNKNOWN_LOCATION: &str = "Unknown";
/// Location recorded when the geolocation lookup fails.
pub const FAILED_LOCATION: &str = "unknown";

// Date/Time Logic
/// Date format used as the day identity (equivalent of `Date.toDateString`).
pub const DATE_KEY_FORMAT: &str = "%a %b %d %Y";
/// Date format accepted by the shell `date` command.
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "diary-client";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
