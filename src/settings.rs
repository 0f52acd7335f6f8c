//! Layered settings: built-in defaults, then an optional `rulebind.toml`
//! (or an explicitly given file), then `RULEBIND_*` environment variables.
//!
//! ```toml
//! namespace = "urn:rulebind:builtIn#"
//! enabled = ["IRIparts", "thisYear"]
//! log_filter = "rulebind=debug"
//! fixed_time = "2024-06-01T12:00:00"
//! ```

use std::sync::Arc;

// config lets you read a separate config file
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

// used for pinning the evaluation clock
use chrono::{NaiveDate, NaiveDateTime};

use tracing_subscriber::EnvFilter;

use crate::builtin::Context;
use crate::error::{Result, RulebindError};
use crate::functions::{IRI_PARTS, THIS_YEAR};

pub const DEFAULT_FILE: &str = "rulebind";
pub const ENV_PREFIX: &str = "RULEBIND";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prepended to the names of the standard built-ins when they are registered.
    pub namespace: String,
    /// Standard built-ins to register at startup.
    pub enabled: Vec<String>,
    pub log_filter: String,
    /// Pins the evaluation clock, e.g. `2024-06-01T12:00:00` or `2024-06-01`.
    pub fixed_time: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: "urn:rulebind:builtIn#".to_string(),
            enabled: vec![IRI_PARTS.to_string(), THIS_YEAR.to_string()],
            log_filter: "info".to_string(),
            fixed_time: None,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_from(path, Self::environment())
    }
    /// Same layering as [`Settings::load`] with the environment layer given.
    pub fn load_from(path: Option<&str>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder().add_source(File::with_name(DEFAULT_FILE).required(false));
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(true));
        }
        let config = builder.add_source(environment).build()?;
        Ok(config.try_deserialize()?)
    }
    /// `RULEBIND_*` variables, where `RULEBIND_ENABLED` is a comma separated list.
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("enabled")
    }
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
    pub fn fixed_now(&self) -> Result<Option<NaiveDateTime>> {
        let Some(fixed) = self.fixed_time.as_deref() else {
            return Ok(None);
        };
        if let Ok(datetime) = fixed.parse::<NaiveDateTime>() {
            return Ok(Some(datetime));
        }
        NaiveDate::parse_from_str(fixed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Some)
            .ok_or_else(|| RulebindError::Config(format!("fixed_time '{}' is not a date or timestamp", fixed)))
    }
    pub fn context(&self) -> Result<Arc<Context>> {
        let context = match self.fixed_now()? {
            Some(now) => Context::fixed(now),
            None => Context::default(),
        };
        Ok(Arc::new(context))
    }
    pub fn init_tracing(&self) -> Result<()> {
        let filter = EnvFilter::try_new(&self.log_filter).map_err(|e| RulebindError::Config(e.to_string()))?;
        // a subscriber may already be installed, by a test harness for instance
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        Ok(())
    }
}
