//! Data directory, config file and logging setup.

use std::path::{Path, PathBuf};

use ideapool_core::{Config, ConfigError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub(crate) const DATA_DIR_ENV: &str = "IDEAPOOL_DATA_DIR";
pub(crate) const CONFIG_ENV: &str = "IDEAPOOL_CONFIG";
const LOG_ENV: &str = "IDEAPOOL_LOG";

const APP_DIR: &str = "ideapool";
const CONFIG_FILE: &str = "config.toml";

/// `--data-dir` (or its env var) when given, else the platform data dir.
pub(crate) fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

/// `--config` (or its env var), then `<data-dir>/config.toml` when present,
/// then the built-in defaults.
pub(crate) fn resolve_config(flag: Option<&Path>, data_dir: &Path) -> Result<Config, ConfigError> {
    if let Some(path) = flag {
        tracing::info!(path = %path.display(), "loading config");
        return Config::load(path);
    }
    let local = data_dir.join(CONFIG_FILE);
    if local.is_file() {
        tracing::info!(path = %local.display(), "loading config");
        return Config::load(&local);
    }
    tracing::debug!("no config file; using defaults");
    Ok(Config::default())
}

/// Install the stderr subscriber. `IDEAPOOL_LOG` wins over `RUST_LOG`.
pub(crate) fn init_logging(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
