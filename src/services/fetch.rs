//! Fetch remote files as text

use crate::models::RemoteFileHandle;
use crate::services::remote::RemoteFiles;
use crate::Result;

/// Decode bytes as UTF-8, replacing every malformed sequence with U+FFFD.
///
/// Never fails. Decoding already-decoded text returns it unchanged.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Fetch a file through the backend and decode it leniently.
pub fn fetch_file_text(files: &dyn RemoteFiles, file: &RemoteFileHandle) -> Result<String> {
    let bytes = files.fetch_bytes(file)?;
    let text = decode_text(&bytes);
    if text.as_bytes() != bytes.as_slice() {
        log::warn!(
            "{} contained invalid UTF-8; malformed bytes were replaced",
            file.path
        );
    }
    Ok(text)
}
