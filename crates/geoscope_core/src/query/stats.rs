//! Text for the statistics readout next to the result panel

use super::{QueryKind, QueryResult};

/// Readout shown before any query has run, and after results are cleared.
pub const IDLE_STATS: &str = "No query executed";

/// Readout shown while a query is running.
pub fn loading_text(kind: QueryKind) -> String {
    format!("{}...", kind.label())
}

/// `"<label> | <count> results | <elapsed> ms"`.
pub fn format_stats(result: &QueryResult) -> String {
    format!(
        "{} | {} results | {:.2} ms",
        result.kind().label(),
        result.count(),
        result.elapsed_ms()
    )
}
