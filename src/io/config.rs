//! Configuration file loading
//!
//! Settings live in a required primary file (`config.json`) and an optional
//! secure file (`secure/secure_config.json`) that is meant to stay out of
//! version control. The secure file fills every key the primary leaves absent,
//! empty or `null`; otherwise the primary file wins.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_SECURE_CONFIG_PATH: &str = "secure/secure_config.json";

/// Resolved settings. Keys not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "API_KEY", default)]
    pub api_key: Option<String>,
    #[serde(rename = "SERVER_ID", default)]
    pub server_id: Option<String>,
}

impl Config {
    /// The API credential, if set and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }

    /// The target server, if set and non-blank.
    #[must_use]
    pub fn server_id(&self) -> Option<&str> {
        non_blank(self.server_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Fill keys that are absent, empty or `null` in `primary` from `secure`.
pub fn merge_values(primary: &mut Map<String, Value>, secure: Map<String, Value>) {
    for (key, secure_value) in secure {
        if is_unset(primary.get(&key)) {
            primary.insert(key, secure_value);
        }
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>> {
    let text = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::Config(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
        Err(e) => Err(Error::Config(format!("{}: {e}", path.display()))),
    }
}

/// Load and merge the primary and secure configuration files.
///
/// Fails when the primary file is missing or when no API key survives the
/// merge.
pub fn load_config<P: AsRef<Path>, S: AsRef<Path>>(primary: P, secure: S) -> Result<Config> {
    let primary = primary.as_ref();
    let secure = secure.as_ref();

    if !primary.exists() {
        return Err(Error::Config(format!("{} not found", primary.display())));
    }

    let mut values = read_object(primary)?;

    if secure.exists() {
        log::debug!("Merging secure config from {}", secure.display());
        merge_values(&mut values, read_object(secure)?);
    }

    let config: Config = serde_json::from_value(Value::Object(values))
        .map_err(|e| Error::Config(format!("{}: {e}", primary.display())))?;

    if config.api_key().is_none() {
        return Err(Error::Config("API_KEY is required but missing".to_string()));
    }

    Ok(config)
}
