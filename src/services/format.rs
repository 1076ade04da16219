//! Human-readable formatting helpers

/// Nominal game speed used only for display; the tick counts themselves are
/// reported untouched.
pub const NOMINAL_TICKS_PER_SECOND: u64 = 20;

/// Format a tick count as an approximate wall-clock duration (e.g. "1h 05m").
#[must_use]
pub fn format_ticks(ticks: u64) -> String {
    let total_secs = ticks / NOMINAL_TICKS_PER_SECOND;
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{days}d {hours:02}h {minutes:02}m")
    } else if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
