#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line explorer for a global mining-asset dataset.
//!
//! ```text
//! mine_map stats [--country Chile] [--top 10]
//! mine_map list [--search gold] [--limit 50]
//! mine_map facets
//! mine_map export --format csv [--commodity Copper] [--out exports]
//! ```
//!
//! Running `mine_map` with no subcommand enters interactive mode.
//!
//! Uses `indicatif-log-bridge` (via [`mine_map_cli_utils::init_logger`]) to
//! route `log` output through `indicatif::MultiProgress` so log lines and
//! the load progress bar never fight for the terminal.

mod display;
mod interactive;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mine_map_cli_utils::IndicatifProgress;
use mine_map_export::ExportFormat;
use mine_map_mine_models::FilterUpdate;
use mine_map_store::FeatureStore;
use mine_map_viewer::{ViewerConfig, ViewerState};

#[derive(Parser)]
#[command(name = "mine_map", about = "Explore a global mining-asset dataset")]
struct Cli {
    /// `GeoJSON` dataset to load (defaults to the config's `dataset_path`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// TOML config file overriding the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the matching mines
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
        /// Length of each top-N ranking
        #[arg(long)]
        top: Option<usize>,
    },
    /// List the matching mines
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Maximum number of mines to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show the values available to each filter
    Facets,
    /// Export the matching mines
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output format (json or csv)
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        /// Directory to write the export into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Explore the dataset from a menu (default)
    Interactive,
}

/// Filter flags shared by the non-interactive subcommands.
#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive text matched against name, country, and commodity
    #[arg(long)]
    search: Option<String>,
    /// Keep mines whose primary or secondary commodity matches (repeatable)
    #[arg(long = "commodity")]
    commodities: Vec<String>,
    /// Keep mines in this country (repeatable)
    #[arg(long = "country")]
    countries: Vec<String>,
    /// Keep mines with exactly this asset type (repeatable)
    #[arg(long = "asset-type")]
    asset_types: Vec<String>,
}

impl FilterArgs {
    fn into_update(self) -> FilterUpdate {
        FilterUpdate {
            search_query: self.search,
            selected_commodities: Some(self.commodities.into_iter().collect()),
            selected_countries: Some(self.countries.into_iter().collect()),
            selected_asset_types: Some(self.asset_types.into_iter().collect()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = mine_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = ViewerConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.dataset_path = data;
    }
    if let Some(Commands::Stats { top: Some(top), .. }) = &cli.command {
        config.top_n = *top;
    }

    let mut store = FeatureStore::new();
    let progress = IndicatifProgress::load_bar(
        &multi,
        &format!("Loading {}", config.dataset_path.display()),
    );
    let collection = store.load_path(&config.dataset_path, progress).await?;

    let mut state = ViewerState::new(&config);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Stats { filters, .. } => {
            state.update_filters(filters.into_update());
            let active = state.active(collection);
            display::print_stats(&state.stats(&active), state.is_filtered());
        }
        Commands::List { filters, limit } => {
            state.update_filters(filters.into_update());
            let active = state.active(collection);
            display::print_mines(&active, state.color_scheme(), limit);
        }
        Commands::Facets => {
            display::print_facets(&mine_map_filter::facets(collection));
        }
        Commands::Export {
            filters,
            format,
            out,
        } => {
            state.update_filters(filters.into_update());
            let active = state.active(collection);
            display::export_to(&state, &active, format, &out).await?;
        }
        Commands::Interactive => interactive::run(&mut state, collection).await?,
    }

    Ok(())
}
