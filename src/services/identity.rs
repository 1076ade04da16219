//! Player identity mapping built from the server's user cache

use crate::models::RemoteFileHandle;
use crate::services::document;
use crate::services::remote::RemoteFiles;
use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_KEY_FIELD: &str = "uuid";
pub const NAME_FIELD: &str = "name";

/// What to do with an identity record that lacks a required field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFieldPolicy {
    /// Abort on the first incomplete record.
    #[default]
    Fail,
    /// Log a warning and leave the record out.
    SkipAndWarn,
}

/// Immutable UUID → display name lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMapping {
    names: HashMap<String, String>,
}

impl IdentityMapping {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.names.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IdentityMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn string_field<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// Turn identity records into a lookup keyed by `key_field`.
///
/// Later records with a duplicate key overwrite earlier ones.
pub fn build_mapping(
    records: &[Value],
    key_field: &str,
    policy: MissingFieldPolicy,
) -> Result<IdentityMapping> {
    let mut names = HashMap::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let key = string_field(record, key_field);
        let name = string_field(record, NAME_FIELD);

        let (Some(key), Some(name)) = (key, name) else {
            let field = if key.is_none() { key_field } else { NAME_FIELD };
            let error = Error::MissingField {
                path: None,
                index,
                field: field.to_string(),
            };
            match policy {
                MissingFieldPolicy::Fail => return Err(error),
                MissingFieldPolicy::SkipAndWarn => {
                    log::warn!("Skipping identity record: {error}");
                    continue;
                }
            }
        };

        if let Some(previous) = names.insert(key.to_string(), name.to_string()) {
            log::debug!("Identity {key} renamed from {previous} to {name}");
        }
    }

    Ok(IdentityMapping { names })
}

/// Fetch the identity source and build the lookup from it.
pub fn load_mapping(
    files: &dyn RemoteFiles,
    source: &RemoteFileHandle,
    key_field: &str,
    policy: MissingFieldPolicy,
) -> Result<IdentityMapping> {
    let value = document::load(files, source)?;
    let Value::Array(records) = value else {
        return Err(Error::MalformedDocument {
            path: Some(source.path.clone()),
            message: "expected a JSON array of player records".to_string(),
        });
    };
    build_mapping(&records, key_field, policy).map_err(|e| e.at_path(&source.path))
}
