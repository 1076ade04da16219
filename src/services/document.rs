//! JSON document loading

use crate::models::RemoteFileHandle;
use crate::services::fetch::fetch_file_text;
use crate::services::remote::RemoteFiles;
use crate::{Error, Result};
use serde_json::Value;

/// Parse text into a JSON value. No schema is enforced here.
pub fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::MalformedDocument {
        path: None,
        message: e.to_string(),
    })
}

/// Fetch, decode and parse a remote JSON document.
pub fn load(files: &dyn RemoteFiles, file: &RemoteFileHandle) -> Result<Value> {
    let text = fetch_file_text(files, file)?;
    parse(&text).map_err(|e| e.at_path(&file.path))
}
