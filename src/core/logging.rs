//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise the level from settings or
//! `--log-level` is used as the filter. Output goes to stderr so stdout
//! stays clean for analysis reports.

use tracing_subscriber::EnvFilter;

use super::error::{ConfigError, ConfigResult};

/// Build the filter: `RUST_LOG` if present and valid, else `default_level`
pub fn build_filter(default_level: &str) -> ConfigResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| ConfigError::Logging {
            message: format!("invalid log filter `{default_level}`: {e}"),
        }),
    }
}

/// Install the global fmt subscriber
///
/// # Errors
///
/// [`ConfigError::Logging`] when the filter does not parse or a subscriber
/// is already installed.
pub fn init_logging(default_level: &str) -> ConfigResult<()> {
    let filter = build_filter(default_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ConfigError::Logging {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_level_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(matches!(
            build_filter("info,xfchess=loudest"),
            Err(ConfigError::Logging { .. })
        ));
        assert!(build_filter("debug").is_ok());
    }
}
