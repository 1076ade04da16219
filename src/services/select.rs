//! Target server selection

use crate::models::ServerInfo;
use crate::{Error, Result};

/// Outcome of matching the account's servers against the configured ID
#[derive(Debug, Clone)]
pub enum Selection {
    /// The account has exactly one server; any configured ID is ignored.
    Only(ServerInfo),
    /// The configured ID matched one of several servers.
    Configured(ServerInfo),
    /// Several servers and no ID configured; the caller must ask for one.
    Ambiguous(Vec<ServerInfo>),
}

impl Selection {
    #[must_use]
    pub fn server(&self) -> Option<&ServerInfo> {
        match self {
            Selection::Only(server) | Selection::Configured(server) => Some(server),
            Selection::Ambiguous(_) => None,
        }
    }
}

/// Pick the server to report on
pub fn select_server(mut servers: Vec<ServerInfo>, configured_id: Option<&str>) -> Result<Selection> {
    let configured_id = configured_id.map(str::trim).filter(|id| !id.is_empty());

    match servers.len() {
        0 => Err(Error::InvalidInput(
            "There are no servers associated with this exaroton account".to_string(),
        )),
        1 => {
            let only = servers.remove(0);
            if let Some(id) = configured_id.filter(|id| *id != only.id) {
                log::warn!(
                    "Account has a single server ({}); ignoring configured server ID {id}",
                    only.id
                );
            }
            Ok(Selection::Only(only))
        }
        _ => match configured_id {
            None => Ok(Selection::Ambiguous(servers)),
            Some(id) => servers
                .into_iter()
                .find(|s| s.id == id)
                .map(Selection::Configured)
                .ok_or_else(|| {
                    Error::InvalidInput(format!("Could not find server with server ID \"{id}\""))
                }),
        },
    }
}
