//! # Logging Setup
//!
//! Installs a global `tracing` subscriber described by [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level when set.
//!
//! ```rust,no_run
//! use resource_metadata::config::LoggingConfig;
//! use resource_metadata::utils::logging::init_logging;
//!
//! init_logging(&LoggingConfig::default()).expect("logging");
//! tracing::info!("ready");
//! ```

use crate::config::LoggingConfig;
use crate::error::{MetadataError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Calling this twice returns an error.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(MetadataError::ConfigError(errors.join("; ")));
    }

    let file = match (config.log_to_file, config.log_file_path.as_deref()) {
        (true, Some(path)) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| MetadataError::ConfigError(format!("Failed to open log file: {e}")))?,
        ),
        _ => None,
    };

    match (config.log_to_console, file) {
        (true, Some(file)) => install(config, std::io::stdout.and(Mutex::new(file))),
        (false, Some(file)) => install(config, Mutex::new(file)),
        (true, None) => install(config, std::io::stdout),
        (false, None) => Err(MetadataError::ConfigError(
            "No logging output enabled".to_string(),
        )),
    }
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()))
}

fn install<W>(config: &LoggingConfig, writer: W) -> Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(writer)
        .with_target(true);

    let result = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| MetadataError::ConfigError(format!("Failed to initialize logging: {e}")))?;
    tracing::debug!(app = %config.app_name, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected_before_install() {
        let config = LoggingConfig {
            log_to_console: false,
            log_to_file: false,
            ..LoggingConfig::default()
        };
        assert!(matches!(
            init_logging(&config),
            Err(MetadataError::ConfigError(_))
        ));
    }
}
