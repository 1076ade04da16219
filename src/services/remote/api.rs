//! exaroton control-plane client using a blocking HTTP client.
//! Every JSON endpoint answers with the same `{ success, error?, data? }`
//! envelope; file downloads return the raw bytes.

use super::{BackendKind, RemoteFiles};
use crate::models::{AccountInfo, DirectoryEntry, RemoteFileHandle, ServerInfo};
use crate::{Error, Result};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.exaroton.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const UNKNOWN_API_ERROR: &str = "Unknown API error";

/// Connection settings for [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    data: Option<T>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FileInfo {
    #[serde(default)]
    is_directory: bool,
    #[serde(default)]
    children: Option<Vec<ChildInfo>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_directory: bool,
}

/// Authenticated client for a single API credential
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client for the supplied bearer token.
    pub fn new(token: &str, opts: &ClientOptions) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(Error::InvalidInput("API key must not be empty".to_string()));
        }

        let base_url = Url::parse(&opts.base_url).map_err(|e| {
            Error::InvalidInput(format!("Invalid API base URL '{}': {e}", opts.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidInput(format!(
                "API base URL cannot carry a path: {}",
                opts.base_url
            )));
        }

        let http = Client::builder()
            .timeout(opts.timeout)
            .user_agent(concat!("playtime/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::System(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: token.trim().to_string(),
        })
    }

    /// Fetch the account the credential belongs to. Doubles as a token check.
    pub fn account(&self) -> Result<AccountInfo> {
        let url = self.endpoint(&["account"], true)?;
        let body = self.get(url, "account", false)?;
        decode_envelope::<AccountInfo>(&body, "account")?
            .ok_or_else(|| missing_data("account"))
    }

    /// List all servers visible to the account.
    pub fn servers(&self) -> Result<Vec<ServerInfo>> {
        let url = self.endpoint(&["servers"], true)?;
        let body = self.get(url, "servers", false)?;
        Ok(decode_envelope::<Vec<ServerInfo>>(&body, "servers")?.unwrap_or_default())
    }

    /// Fetch a single server by ID.
    pub fn server(&self, server_id: &str) -> Result<ServerInfo> {
        let label = format!("servers/{server_id}");
        let url = self.endpoint(&["servers", server_id], true)?;
        let body = self.get(url, &label, false)?;
        decode_envelope::<ServerInfo>(&body, &label)?.ok_or_else(|| missing_data(&label))
    }

    /// Build an endpoint URL. Each segment is percent-encoded as a whole, so a
    /// slash inside a file path travels as `%2F`.
    fn endpoint(&self, segments: &[&str], trailing_slash: bool) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                Error::InvalidInput(format!("API base URL cannot carry a path: {}", self.base_url))
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
            if trailing_slash {
                path.push("");
            }
        }
        Ok(url)
    }

    /// GET `url` and return the body of a 2xx response. With
    /// `missing_is_not_found`, a 404 becomes `NotFound` rather than `Transport`.
    fn get(&self, url: Url, label: &str, missing_is_not_found: bool) -> Result<Vec<u8>> {
        log::debug!("GET {url}");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| transport_error(label, &e))?;

        let status = response.status();
        if missing_is_not_found && status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                path: label.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Error::Transport {
                path: label.to_string(),
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let body = response.bytes().map_err(|e| transport_error(label, &e))?;
        log::trace!("Received {} bytes for {label}", body.len());
        Ok(body.to_vec())
    }
}

impl RemoteFiles for ApiClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Api
    }

    fn list_children(&self, dir: &RemoteFileHandle) -> Result<Vec<DirectoryEntry>> {
        let url = self.endpoint(
            &["servers", dir.server_id.as_str(), "files", "info", dir.path.as_str()],
            true,
        )?;
        let body = self.get(url, &dir.path, false)?;
        parse_listing(&body, &dir.path)
    }

    fn fetch_bytes(&self, file: &RemoteFileHandle) -> Result<Vec<u8>> {
        let url = self.endpoint(
            &["servers", file.server_id.as_str(), "files", "data", file.path.as_str()],
            false,
        )?;
        self.get(url, &file.path, true)
    }
}

/// Decode a file-information payload into the directory's immediate children.
pub fn parse_listing(body: &[u8], path: &str) -> Result<Vec<DirectoryEntry>> {
    let info = decode_envelope::<FileInfo>(body, path)?.unwrap_or_default();

    if !info.is_directory {
        return Err(Error::NotADirectory {
            path: path.to_string(),
        });
    }

    let entries = info
        .children
        .unwrap_or_default()
        .into_iter()
        .filter_map(|child| match child.name {
            Some(name) if !name.is_empty() => Some(DirectoryEntry {
                name,
                is_directory: child.is_directory,
            }),
            _ => {
                log::debug!("Dropping unnamed child of {path}");
                None
            }
        })
        .collect();

    Ok(entries)
}

fn decode_envelope<T: DeserializeOwned>(body: &[u8], label: &str) -> Result<Option<T>> {
    let envelope: Envelope<T> =
        serde_json::from_slice(body).map_err(|e| Error::MalformedDocument {
            path: Some(label.to_string()),
            message: e.to_string(),
        })?;

    if !envelope.success {
        let message = envelope
            .error
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string());
        return Err(Error::Api {
            path: label.to_string(),
            message,
        });
    }

    Ok(envelope.data)
}

fn missing_data(label: &str) -> Error {
    Error::Api {
        path: label.to_string(),
        message: "response carried no data".to_string(),
    }
}

fn transport_error(label: &str, err: &reqwest::Error) -> Error {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    };
    Error::Transport {
        path: label.to_string(),
        status: err.status().map(|s| s.as_u16()),
        message,
    }
}
