//! Join aggregated stats against the identity mapping

use crate::models::{PlayerIssue, ReportLine};
use crate::services::aggregate::AggregatedStats;
use crate::services::identity::IdentityMapping;
use crate::Error;
use serde_json::Value;

pub const CUSTOM_STATS_CATEGORY: &str = "minecraft:custom";
pub const TOTAL_WORLD_TIME_STAT: &str = "minecraft:total_world_time";

/// Lines and per-player issues produced by a join
#[derive(Debug, Default)]
pub struct PlayerReport {
    pub lines: Vec<ReportLine>,
    pub issues: Vec<PlayerIssue>,
}

/// Sort report lines by a specified field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Playtime,
    Name,
    Uuid,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "playtime" | "time" => Ok(SortBy::Playtime),
            "name" => Ok(SortBy::Name),
            "uuid" => Ok(SortBy::Uuid),
            _ => Err(format!(
                "Invalid sort: {s}. Use 'playtime', 'name' or 'uuid'"
            )),
        }
    }
}

/// Read `stats["minecraft:custom"]["minecraft:total_world_time"]` from a stats document.
pub fn extract_playtime(uuid: &str, document: &Value) -> Result<u64, Error> {
    let shape_error = |detail: String| Error::StatsShape {
        uuid: uuid.to_string(),
        detail,
    };

    let value = document
        .get("stats")
        .ok_or_else(|| shape_error("missing 'stats' object".to_string()))?
        .get(CUSTOM_STATS_CATEGORY)
        .ok_or_else(|| shape_error(format!("missing '{CUSTOM_STATS_CATEGORY}' category")))?
        .get(TOTAL_WORLD_TIME_STAT)
        .ok_or_else(|| shape_error(format!("missing '{TOTAL_WORLD_TIME_STAT}'")))?;

    value.as_u64().ok_or_else(|| {
        shape_error(format!(
            "'{TOTAL_WORLD_TIME_STAT}' is not an integer tick count: {value}"
        ))
    })
}

/// Produce one line per player whose name resolves and whose stats carry a
/// playtime counter. Everything else becomes an issue for that player only.
#[must_use]
pub fn generate_report(identities: &IdentityMapping, stats: &AggregatedStats) -> PlayerReport {
    let mut report = PlayerReport::default();

    for (uuid, document) in stats.iter() {
        let Some(name) = identities.get(uuid) else {
            report.issues.push(PlayerIssue {
                uuid: uuid.to_string(),
                error: Error::UnresolvedPlayer {
                    uuid: uuid.to_string(),
                },
            });
            continue;
        };

        match extract_playtime(uuid, document) {
            Ok(ticks) => report.lines.push(ReportLine {
                uuid: uuid.to_string(),
                name: name.to_string(),
                total_playtime_ticks: ticks,
            }),
            Err(error) => report.issues.push(PlayerIssue {
                uuid: uuid.to_string(),
                error,
            }),
        }
    }

    report
}

/// Sort and limit lines to top K
#[must_use]
pub fn sort_and_limit(
    mut lines: Vec<ReportLine>,
    sort_by: Option<SortBy>,
    top_k: Option<usize>,
) -> Vec<ReportLine> {
    match sort_by {
        Some(SortBy::Playtime) => {
            lines.sort_by(|a, b| b.total_playtime_ticks.cmp(&a.total_playtime_ticks));
        }
        Some(SortBy::Name) => {
            lines.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        Some(SortBy::Uuid) => {
            lines.sort_by(|a, b| a.uuid.cmp(&b.uuid));
        }
        None => {}
    }

    if let Some(k) = top_k {
        lines.truncate(k);
    }

    lines
}
