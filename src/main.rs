/*!
# diary-client

Command-line client for an end-to-end encrypted daily journal.

## Usage

```
diary-client [OPTIONS] [COMMAND]

Commands:
  open    Unlock the key, authenticate and open today's entry (default)
  keygen  Generate a new passphrase-protected key pair

Options:
  -v, --verbose                 Enable verbose output
      --log-format <FORMAT>     Log output format: text or json
  -h, --help                    Print help information
  -V, --version                 Print version information
```

## Configuration

- `DIARY_SERVER_URL`: Base URL of the diary server (defaults to http://127.0.0.1:8080)
- `DIARY_DIR`: Directory holding the sealed private key (defaults to ~/.diary)
- `DIARY_GEOIP_URL`: Geolocation endpoint, empty to disable
- `DIARY_TIMEOUT_SECS`: HTTP timeout in seconds
- `DIARY_PASSPHRASE`: Passphrase for non-interactive use
*/

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{debug, error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use diary_client::cli::{shell, CliArgs, Command};
use diary_client::constants::{
    DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, PRIVATE_KEY_FILE_NAME, TRACING_SERVICE_NAME,
};
use diary_client::crypto::PrivateKey;
use diary_client::errors::{AppError, AppResult};
use diary_client::prompt::{prompt_new_passphrase, Interaction, Notice, TerminalInteraction};
use diary_client::storage::write_private_file;
use diary_client::{bootstrap, Config};

fn init_tracing(args: &CliArgs) {
    let default_level = if args.verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("diary_client={}", default_level)));

    let layer = if args.log_format == LOG_FORMAT_JSON {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).init();
}

fn keygen(out: Option<PathBuf>) -> AppResult<()> {
    let path = match out {
        Some(path) => path,
        None => PathBuf::from(PRIVATE_KEY_FILE_NAME),
    };
    if path.exists() {
        return Err(AppError::Config(format!(
            "Refusing to overwrite existing key at {}",
            path.display()
        )));
    }

    let passphrase = prompt_new_passphrase()?;
    let key = PrivateKey::generate();
    let public = key.public();

    write_private_file(&path, &key.seal(&passphrase)?)?;
    let public_path = public_key_path(&path);
    write_private_file(&public_path, &public.to_armored()?)?;

    info!("Generated new key pair");
    println!("Private key: {}", path.display());
    println!("Public key:  {}", public_path.display());
    println!("Fingerprint: {}", public.fingerprint());
    Ok(())
}

fn public_key_path(private: &Path) -> PathBuf {
    let mut name = private.as_os_str().to_owned();
    name.push(".pub");
    PathBuf::from(name)
}

async fn open(interaction: Arc<TerminalInteraction>) -> AppResult<()> {
    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let journal = bootstrap::start(&config, interaction).await?;
    shell::run(&journal).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);
    debug!(service = TRACING_SERVICE_NAME, "CLI arguments: {:?}", args);

    let interaction = Arc::new(TerminalInteraction);
    let result = match args.command() {
        Command::Keygen { out } => keygen(out),
        Command::Open => open(interaction.clone()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            interaction.notify(&Notice::Fatal(e.to_string()));
            ExitCode::FAILURE
        }
    }
}
