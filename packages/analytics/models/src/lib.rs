#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistic types for a set of mines.
//!
//! These are pure derived values: they are recomputed whenever the active
//! set changes and never stored as authoritative state.

use serde::{Deserialize, Serialize};

/// Number of mines sharing one attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCount {
    /// The attribute value (commodity, country, or asset type).
    pub value: String,
    /// Number of mines with that value.
    pub count: u64,
}

impl RankedCount {
    /// Creates a new count entry.
    #[must_use]
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

/// Summary statistics over a set of mines.
///
/// Per-value counts are listed in first-seen order. The `top_*` lists are
/// sorted by count descending, ties keeping first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of mines in the set.
    pub total_mines: u64,
    /// Number of distinct non-empty countries.
    pub countries: u64,
    /// Counts per lowercased primary commodity.
    pub commodity_counts: Vec<RankedCount>,
    /// Counts per raw asset type string.
    pub asset_type_counts: Vec<RankedCount>,
    /// Counts per country.
    pub country_counts: Vec<RankedCount>,
    /// Most common primary commodities.
    pub top_commodities: Vec<RankedCount>,
    /// Most common countries.
    pub top_countries: Vec<RankedCount>,
    /// Most common asset types.
    pub top_asset_types: Vec<RankedCount>,
    /// Bounding box of all mines, `None` for an empty set.
    pub bounds: Option<Bounds>,
}

impl AggregateStats {
    /// Count for a lowercased commodity, zero if absent.
    #[must_use]
    pub fn commodity_count(&self, commodity: &str) -> u64 {
        count_of(&self.commodity_counts, commodity)
    }

    /// Count for a country, zero if absent.
    #[must_use]
    pub fn country_count(&self, country: &str) -> u64 {
        count_of(&self.country_counts, country)
    }

    /// Count for a raw asset type, zero if absent.
    #[must_use]
    pub fn asset_type_count(&self, asset_type: &str) -> u64 {
        count_of(&self.asset_type_counts, asset_type)
    }

    /// Share of the total held by `count`, as a fraction in `[0, 1]`.
    /// Zero when the set is empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn share(&self, count: u64) -> f64 {
        if self.total_mines == 0 {
            0.0
        } else {
            count as f64 / self.total_mines as f64
        }
    }
}

fn count_of(counts: &[RankedCount], value: &str) -> u64 {
    counts
        .iter()
        .find(|c| c.value == value)
        .map_or(0, |c| c.count)
}
