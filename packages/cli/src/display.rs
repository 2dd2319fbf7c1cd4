//! Plain-text rendering of mines, statistics, and facets for the terminal.

use std::path::{Path, PathBuf};

use mine_map_analytics_models::{AggregateStats, RankedCount};
use mine_map_export::ExportFormat;
use mine_map_filter::Facets;
use mine_map_mine_models::{
    Mine,
    color::{ColorScheme, mine_color},
};
use mine_map_viewer::{ExportFile, ViewerState};

const NAME_WIDTH: usize = 40;

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let head: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

fn print_ranking(title: &str, stats: &AggregateStats, ranking: &[RankedCount]) {
    println!("{title}:");
    if ranking.is_empty() {
        println!("  (none)");
        return;
    }
    for entry in ranking {
        println!(
            "  {:<30} {:>7}  {:>5.1}%",
            truncate(&entry.value, 30),
            entry.count,
            stats.share(entry.count) * 100.0
        );
    }
}

/// Prints a statistics summary.
pub fn print_stats(stats: &AggregateStats, filtered: bool) {
    let scope = if filtered { " (filtered)" } else { "" };
    println!("Total mines{scope}: {}", stats.total_mines);
    println!("Countries: {}", stats.countries);

    if let Some(bounds) = stats.bounds {
        println!(
            "Extent: {:.2}..{:.2} lon, {:.2}..{:.2} lat",
            bounds.west, bounds.east, bounds.south, bounds.north
        );
    }

    println!();
    print_ranking("Top commodities", stats, &stats.top_commodities);
    print_ranking("Top countries", stats, &stats.top_countries);
    print_ranking("Top asset types", stats, &stats.top_asset_types);
}

/// Prints up to `limit` mines as a table, colored by `scheme`.
pub fn print_mines(mines: &[&Mine], scheme: ColorScheme, limit: usize) {
    if mines.is_empty() {
        println!("No mines match the current filters.");
        return;
    }

    println!(
        "{:<NAME_WIDTH$} {:<20} {:<14} {:<16} {:<8} {}",
        "NAME", "COUNTRY", "COMMODITY", "ASSET TYPE", "COLOR", "LON,LAT"
    );
    println!("{}", "-".repeat(120));

    for mine in mines.iter().take(limit) {
        println!(
            "{:<NAME_WIDTH$} {:<20} {:<14} {:<16} {:<8} {:.4},{:.4}",
            truncate(mine.name().unwrap_or("(unnamed)"), NAME_WIDTH),
            truncate(mine.country().unwrap_or("-"), 20),
            truncate(mine.primary_commodity().unwrap_or("-"), 14),
            truncate(mine.asset_type().unwrap_or("-"), 16),
            mine_color(mine, scheme),
            mine.longitude,
            mine.latitude,
        );
    }

    if mines.len() > limit {
        println!("\n... and {} more", mines.len() - limit);
    }
    println!("\n{} mine(s)", mines.len());
}

fn print_values(title: &str, values: &[String]) {
    println!("{title} ({}):", values.len());
    for value in values {
        println!("  {value}");
    }
}

/// Prints the distinct values available to each filter.
pub fn print_facets(facets: &Facets) {
    print_values("Commodities", &facets.commodities);
    print_values("Countries", &facets.countries);
    print_values("Asset types", &facets.asset_types);
}

async fn write_export(dir: &Path, file: &ExportFile) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file.file_name);
    tokio::fs::write(&path, &file.bytes).await?;
    log::info!("Wrote {} bytes to {}", file.bytes.len(), path.display());
    Ok(path)
}

/// Exports `active` in `format` into `dir` and prints where it went. An
/// empty set is a no-op: nothing is written and `Ok(None)` is returned.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub async fn export_to(
    state: &ViewerState,
    active: &[&Mine],
    format: ExportFormat,
    dir: &Path,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let Some(file) = state.export(format, active)? else {
        println!("No mines match the current filters; nothing exported.");
        return Ok(None);
    };

    let path = write_export(dir, &file).await?;
    println!("Exported {} mines to {}", active.len(), path.display());
    Ok(Some(path))
}
