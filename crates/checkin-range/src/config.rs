//! Configuration loading.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.
//!
//! ```toml
//! timezone = "America/New_York"
//! default_range = "last7days"
//! page_size = 25
//!
//! [params]
//! start = "startDate"
//! end = "endDate"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{RangeError, Result};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::query::ParamNames;
use crate::range::NamedRange;
use crate::zone::Zone;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// IANA zone name, or `"local"`. Unset means the process-local zone.
    pub timezone: Option<String>,
    pub default_range: NamedRange,
    pub page_size: usize,
    pub params: ParamNames,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: None,
            default_range: NamedRange::Today,
            page_size: DEFAULT_PAGE_SIZE,
            params: ParamNames::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| RangeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(RangeError::Config("page_size must be at least 1".into()));
        }
        if self.params.start.is_empty() || self.params.end.is_empty() {
            return Err(RangeError::Config("param names must not be empty".into()));
        }
        if self.params.start == self.params.end {
            return Err(RangeError::Config(format!(
                "start and end params are both '{}'",
                self.params.start
            )));
        }
        self.zone()?;
        Ok(())
    }

    pub fn zone(&self) -> Result<Zone> {
        match &self.timezone {
            Some(name) => Zone::parse(name),
            None => Ok(Zone::Local),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Install the global subscriber, writing to stderr. `RUST_LOG` takes
    /// precedence over `level`. If a subscriber is already installed it is
    /// kept and the failure is logged through it.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let installed = match self.format {
            LogFormat::Json => fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            LogFormat::Pretty => fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
        };

        if let Err(e) = installed {
            tracing::debug!(error = %e, "tracing subscriber already installed");
        }
    }
}
