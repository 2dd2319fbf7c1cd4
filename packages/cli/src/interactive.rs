//! Menu-driven exploration of a loaded dataset using `dialoguer`.
//!
//! The menu loops until the user quits, so filters, color scheme, zoom, and
//! selection carry over between actions the way they would in a map view.

use std::collections::BTreeMap;
use std::path::PathBuf;

use dialoguer::{Input, MultiSelect, Select};
use mine_map_export::ExportFormat;
use mine_map_mine_models::{FilterUpdate, Mine, color::ColorScheme};
use mine_map_store::FeatureCollection;
use mine_map_viewer::{MapEvent, RenderFrame, RenderLayer, ViewerState};

use crate::display;

/// Top-level actions in the interactive menu.
enum Action {
    Map,
    Search,
    Commodities,
    Countries,
    AssetTypes,
    ResetFilters,
    ColorScheme,
    Zoom,
    Inspect,
    Stats,
    List,
    Export,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Map,
        Self::Search,
        Self::Commodities,
        Self::Countries,
        Self::AssetTypes,
        Self::ResetFilters,
        Self::ColorScheme,
        Self::Zoom,
        Self::Inspect,
        Self::Stats,
        Self::List,
        Self::Export,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Map => "Show map summary",
            Self::Search => "Search",
            Self::Commodities => "Filter by commodity",
            Self::Countries => "Filter by country",
            Self::AssetTypes => "Filter by asset type",
            Self::ResetFilters => "Reset filters",
            Self::ColorScheme => "Change color scheme",
            Self::Zoom => "Change detail level",
            Self::Inspect => "Inspect a mine",
            Self::Stats => "Show statistics",
            Self::List => "List matching mines",
            Self::Export => "Export matching mines",
            Self::Quit => "Quit",
        }
    }
}

const fn scheme_label(scheme: ColorScheme) -> &'static str {
    match scheme {
        ColorScheme::Commodity => "Commodity",
        ColorScheme::AssetType => "Asset type",
        ColorScheme::Confidence => "Confidence factor",
    }
}

/// Prints a frame as a text summary: how many markers are drawn and how
/// they break down by color.
struct SummaryLayer {
    scheme: ColorScheme,
}

impl RenderLayer for SummaryLayer {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        if frame.no_results() {
            println!("No mines match the current filters.");
            return;
        }

        print!(
            "Showing {} of {} mines",
            frame.markers.len(),
            frame.total_matches
        );
        if frame.is_capped() {
            print!(" (increase the detail level to see more)");
        }
        println!();

        let mut by_color: BTreeMap<&str, usize> = BTreeMap::new();
        for marker in &frame.markers {
            *by_color.entry(marker.color).or_default() += 1;
        }

        println!("\nLegend ({}):", scheme_label(self.scheme));
        for (label, color) in self.scheme.legend() {
            if let Some(count) = by_color.remove(color) {
                println!("  {color} {label:<24} {count:>7}");
            }
        }
        let other: usize = by_color.values().sum();
        if other > 0 {
            println!("  {:<7} {:<24} {other:>7}", "", "Other / unknown");
        }

        if let Some(selected) = frame
            .selected
            .and_then(|id| frame.markers.iter().find(|m| m.id == id))
        {
            println!(
                "\nSelected: {}",
                selected.mine.name().unwrap_or("(unnamed)")
            );
        }
    }
}

/// Runs the interactive menu until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or an export cannot be written.
#[allow(clippy::future_not_send)]
pub async fn run(
    state: &mut ViewerState,
    collection: &FeatureCollection,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        let prompt = if state.is_filtered() {
            format!("Mine Map ({} matching)", state.active(collection).len())
        } else {
            format!("Mine Map ({} mines)", collection.len())
        };

        let idx = Select::new()
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Map => {
                let mut layer = SummaryLayer {
                    scheme: state.color_scheme(),
                };
                state.render(collection, &mut layer);
            }
            Action::Search => handle_search(state)?,
            Action::Commodities | Action::Countries | Action::AssetTypes => {
                handle_facet(state, collection, &Action::ALL[idx])?;
            }
            Action::ResetFilters => {
                state.reset_filters();
                println!("Filters cleared.");
            }
            Action::ColorScheme => handle_color_scheme(state)?,
            Action::Zoom => handle_zoom(state, collection)?,
            Action::Inspect => handle_inspect(state, collection)?,
            Action::Stats => {
                let active = state.active(collection);
                display::print_stats(&state.stats(&active), state.is_filtered());
            }
            Action::List => {
                let active = state.active(collection);
                display::print_mines(&active, state.color_scheme(), 50);
            }
            Action::Export => handle_export(state, collection).await?,
            Action::Quit => return Ok(()),
        }
    }
}

fn handle_search(state: &mut ViewerState) -> Result<(), Box<dyn std::error::Error>> {
    let query: String = Input::new()
        .with_prompt("Search name, country, or commodity (empty to clear)")
        .with_initial_text(state.criteria().search_query.clone())
        .allow_empty(true)
        .interact_text()?;
    state.update_filters(FilterUpdate::search(query.trim()));
    Ok(())
}

fn handle_facet(
    state: &mut ViewerState,
    collection: &FeatureCollection,
    action: &Action,
) -> Result<(), Box<dyn std::error::Error>> {
    let facets = mine_map_filter::facets(collection);
    let criteria = state.criteria();
    let (values, current) = match action {
        Action::Commodities => (&facets.commodities, &criteria.selected_commodities),
        Action::Countries => (&facets.countries, &criteria.selected_countries),
        _ => (&facets.asset_types, &criteria.selected_asset_types),
    };

    if values.is_empty() {
        println!("No values available.");
        return Ok(());
    }

    let defaults: Vec<bool> = values.iter().map(|v| current.contains(v)).collect();
    let chosen = MultiSelect::new()
        .with_prompt(format!(
            "{} (space=toggle, enter=confirm)",
            action.label()
        ))
        .items(values)
        .defaults(&defaults)
        .interact()?;

    let picked = chosen.into_iter().map(|i| values[i].clone());
    let update = match action {
        Action::Commodities => FilterUpdate::commodities(picked),
        Action::Countries => FilterUpdate::countries(picked),
        _ => FilterUpdate::asset_types(picked),
    };
    state.update_filters(update);
    Ok(())
}

fn handle_color_scheme(state: &mut ViewerState) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = ColorScheme::all().iter().map(|s| scheme_label(*s)).collect();
    let current = ColorScheme::all()
        .iter()
        .position(|s| *s == state.color_scheme())
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Color mines by")
        .items(&labels)
        .default(current)
        .interact()?;

    let scheme = ColorScheme::all()[idx];
    state.set_color_scheme(scheme);
    println!("Legend:");
    for (label, color) in scheme.legend() {
        println!("  {color} {label}");
    }
    Ok(())
}

fn handle_zoom(
    state: &mut ViewerState,
    collection: &FeatureCollection,
) -> Result<(), Box<dyn std::error::Error>> {
    let detail: f64 = Input::new()
        .with_prompt("Detail level (higher shows more mines)")
        .default(state.detail())
        .interact_text()?;
    state.handle(MapEvent::ViewportChanged { detail }, collection);

    let active = state.active(collection);
    println!(
        "{} of {} matching mines visible at detail {detail}",
        state.visible(&active).len(),
        active.len()
    );
    Ok(())
}

fn handle_inspect(
    state: &mut ViewerState,
    collection: &FeatureCollection,
) -> Result<(), Box<dyn std::error::Error>> {
    let active = state.active(collection);
    let visible = state.visible(&active);
    if visible.is_empty() {
        println!("No mines to inspect.");
        return Ok(());
    }

    let labels: Vec<String> = visible
        .iter()
        .map(|m| {
            format!(
                "{} ({})",
                m.name().unwrap_or("(unnamed)"),
                m.country().unwrap_or("-")
            )
        })
        .collect();

    let idx = Select::new()
        .with_prompt("Select a mine")
        .items(&labels)
        .default(0)
        .max_length(20)
        .interact()?;

    let id = collection.id_of(visible[idx]);
    state.handle(MapEvent::Click(id), collection);

    if let Some(mine) = state.selected(collection) {
        print_details(mine);
    }
    Ok(())
}

fn print_details(mine: &Mine) {
    let field = |label: &str, value: Option<&str>| {
        if let Some(value) = value {
            println!("  {label:<22} {value}");
        }
    };

    println!();
    println!("{}", mine.name().unwrap_or("(unnamed)"));
    let props = &mine.properties;
    field("Group", props.group_names.as_deref());
    field("Country", mine.country());
    field("Primary commodity", mine.primary_commodity());
    field("Secondary commodity", mine.secondary_commodity());
    field("Other commodities", props.other_commodities.as_deref());
    field("Asset type", mine.asset_type());
    field("Confidence", mine.confidence_label());
    println!(
        "  {:<22} {:.4}, {:.4}",
        "Coordinates", mine.longitude, mine.latitude
    );
}

#[allow(clippy::future_not_send)]
async fn handle_export(
    state: &ViewerState,
    collection: &FeatureCollection,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<String> = ExportFormat::all()
        .iter()
        .map(|f| f.as_ref().to_uppercase())
        .collect();
    let idx = Select::new()
        .with_prompt("Export format")
        .items(&labels)
        .default(0)
        .interact()?;
    let format = ExportFormat::all()[idx];

    let dir: String = Input::new()
        .with_prompt("Output directory")
        .default(".".to_string())
        .interact_text()?;

    let active = state.active(collection);
    display::export_to(state, &active, format, &PathBuf::from(dir)).await?;
    Ok(())
}
