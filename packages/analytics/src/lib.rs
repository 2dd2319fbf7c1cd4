#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics over a view of the mine dataset.
//!
//! [`summarize`] walks the view once, tallying countries, commodities, and
//! asset types, then ranks each tally. The same function serves the full
//! dataset and any filtered view.

use std::collections::BTreeMap;

use geo::{BoundingRect, MultiPoint, Point};
use mine_map_analytics_models::{AggregateStats, Bounds, RankedCount};
use mine_map_mine_models::Mine;

/// Number of entries in each top-N ranking shown by default.
pub const DEFAULT_TOP_N: usize = 5;

/// Insertion-ordered counter.
#[derive(Default)]
struct Tally {
    index: BTreeMap<String, usize>,
    entries: Vec<RankedCount>,
}

impl Tally {
    fn add(&mut self, value: &str) {
        if let Some(&i) = self.index.get(value) {
            self.entries[i].count += 1;
        } else {
            self.index.insert(value.to_string(), self.entries.len());
            self.entries.push(RankedCount::new(value, 1));
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Top `n` entries by count. `sort_by` is stable, so equal counts keep
    /// first-seen order.
    fn top(&self, n: usize) -> Vec<RankedCount> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }
}

/// Computes [`AggregateStats`] over `mines` in a single pass, keeping the
/// `top_n` most common commodities, countries, and asset types.
///
/// Empty input yields all-zero, empty statistics.
#[must_use]
pub fn summarize<'a, I>(mines: I, top_n: usize) -> AggregateStats
where
    I: IntoIterator<Item = &'a Mine>,
{
    let mut total = 0_u64;
    let mut countries = Tally::default();
    let mut commodities = Tally::default();
    let mut asset_types = Tally::default();
    let mut points: Vec<Point<f64>> = Vec::new();

    for mine in mines {
        total += 1;
        points.push(Point::new(mine.longitude, mine.latitude));

        if let Some(country) = mine.country() {
            countries.add(country);
        }
        if let Some(commodity) = mine.primary_commodity() {
            commodities.add(&commodity.to_lowercase());
        }
        if let Some(asset_type) = mine.asset_type() {
            asset_types.add(asset_type);
        }
    }

    let bounds = MultiPoint::new(points).bounding_rect().map(|rect| Bounds {
        west: rect.min().x,
        south: rect.min().y,
        east: rect.max().x,
        north: rect.max().y,
    });

    log::debug!(
        "Summarized {total} mines across {} countries",
        countries.len()
    );

    AggregateStats {
        total_mines: total,
        countries: countries.len() as u64,
        top_commodities: commodities.top(top_n),
        top_countries: countries.top(top_n),
        top_asset_types: asset_types.top(top_n),
        commodity_counts: commodities.entries,
        asset_type_counts: asset_types.entries,
        country_counts: countries.entries,
        bounds,
    }
}
