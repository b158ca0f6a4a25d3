//! Text and JSON rendering of growth estimates.

use epicurve::EntityGrowth;
use epicurve_output::GrowthExport;

const RULE: &str = "────────────────────────────────────────────────────────────────────────────────";

/// Render estimates as an aligned table.
pub(crate) fn growth_table(results: &[EntityGrowth]) -> String {
    let mut out = format!(
        "{:<28} {:>10} {:>5} {:>10} {:>7} {:>10} {:>12}\n{RULE}\n",
        "Entity", "Origin", "Obs", "Doubling", "R²", "Last", "Projected"
    );

    for growth in results {
        out.push_str(&growth_row(&growth.to_export()));
        out.push('\n');
    }

    out
}

fn growth_row(row: &GrowthExport) -> String {
    let doubling = row
        .doubling_time
        .map_or_else(|| "-".to_string(), |days| format!("{days:.2}d"));
    let last = row
        .last_value
        .map_or_else(|| "-".to_string(), |value| value.to_string());
    format!(
        "{:<28} {:>10} {:>5} {:>10} {:>7.3} {:>10} {:>12.0}",
        truncate(&row.key, 28),
        row.origin,
        row.observations,
        doubling,
        row.r_squared,
        last,
        row.projected
    )
}

/// Render estimates as pretty JSON.
pub(crate) fn growth_json(results: &[EntityGrowth]) -> serde_json::Result<String> {
    let rows: Vec<GrowthExport> = results.iter().map(EntityGrowth::to_export).collect();
    serde_json::to_string_pretty(&rows)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width - 1).collect();
        short.push('…');
        short
    }
}
