//! Output formatting for CLI

use crate::Report;
use crate::models::{ErrorItem, ReportLine, ServerInfo};
use crate::services::format::format_ticks;

/// Maximum number of issues echoed before summarising the rest
const MAX_ISSUES_SHOWN: usize = 10;

/// Format report lines as human-readable text
#[must_use]
pub fn format_text(lines: &[ReportLine]) -> String {
    if lines.is_empty() {
        return "No player stats found.\n".to_string();
    }

    let mut out = String::new();
    for line in lines {
        out.push_str(&format!("Player: {}\n", line.name));
        out.push_str(&format!("   uuid: {}\n", line.uuid));
        out.push_str(&format!(
            "   total server playtime (ticks): {} (~{})\n",
            line.total_playtime_ticks,
            format_ticks(line.total_playtime_ticks)
        ));
    }
    out
}

/// Format per-player issues as warning lines for stderr
#[must_use]
pub fn format_issues(report: &Report) -> String {
    if report.issues.is_empty() {
        return String::new();
    }

    let mut out = format!("Warnings: {} player(s) skipped\n", report.issues.len());
    for issue in report.issues.iter().take(MAX_ISSUES_SHOWN) {
        out.push_str(&format!("  {}: {}\n", issue.uuid, issue.error));
    }
    if report.issues.len() > MAX_ISSUES_SHOWN {
        out.push_str(&format!(
            "  ... and {} more\n",
            report.issues.len() - MAX_ISSUES_SHOWN
        ));
    }
    out
}

/// Format report as JSON
#[must_use]
pub fn format_json(report: &Report, lines: &[ReportLine]) -> String {
    let issues: Vec<ErrorItem> = report.issues.iter().map(ErrorItem::from).collect();
    let output = serde_json::json!({
        "server_id": report.server_id,
        "players": lines,
        "player_count": lines.len(),
        "issue_count": issues.len(),
        "issues": if issues.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::json!(issues)
        }
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Format the account's servers as a numbered list
#[must_use]
pub fn format_servers_text(servers: &[ServerInfo]) -> String {
    let mut out = String::new();
    out.push_str("--------------------------\n");
    out.push_str("     List of Servers      \n");
    out.push_str("--------------------------\n");
    for (i, server) in servers.iter().enumerate() {
        out.push_str(&format!("Server {}\n", i + 1));
        out.push_str(&format!("  name: {}\n", server.name));
        out.push_str(&format!("  IP: {}\n", server.address));
        out.push_str(&format!("  ID: {}\n", server.id));
    }
    out
}

/// Format the account's servers as JSON
#[must_use]
pub fn format_servers_json(servers: &[ServerInfo]) -> String {
    serde_json::to_string_pretty(servers).unwrap_or_else(|_| "[]".to_string())
}
