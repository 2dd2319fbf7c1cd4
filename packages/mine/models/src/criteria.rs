//! Filter criteria for deriving a view of the mine dataset.
//!
//! Each dimension is independent; an empty query or empty set places no
//! restriction on that dimension. Criteria combine with logical AND across
//! dimensions and OR within a dimension's set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against name, country, and primary
    /// commodity.
    #[serde(default)]
    pub search_query: String,
    /// Matches when the primary or secondary commodity is a member.
    #[serde(default)]
    pub selected_commodities: BTreeSet<String>,
    /// Matches when the country is a member.
    #[serde(default)]
    pub selected_countries: BTreeSet<String>,
    /// Matches when the raw (possibly combined) asset type is a member.
    #[serde(default)]
    pub selected_asset_types: BTreeSet<String>,
}

/// A partial replacement of [`FilterCriteria`]. Every `Some` dimension
/// replaces the corresponding dimension wholesale; `None` leaves it as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    /// New search query.
    pub search_query: Option<String>,
    /// New commodity selection.
    pub selected_commodities: Option<BTreeSet<String>>,
    /// New country selection.
    pub selected_countries: Option<BTreeSet<String>>,
    /// New asset type selection.
    pub selected_asset_types: Option<BTreeSet<String>>,
}

/// One selectable filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    /// Primary/secondary commodity.
    Commodity,
    /// Country.
    Country,
    /// Raw asset type.
    AssetType,
}

impl FilterCriteria {
    /// Returns `true` if any dimension restricts the result.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.search_query.is_empty()
            || !self.selected_commodities.is_empty()
            || !self.selected_countries.is_empty()
            || !self.selected_asset_types.is_empty()
    }

    /// Applies a partial update, replacing each provided dimension.
    pub fn update(&mut self, update: FilterUpdate) {
        if let Some(query) = update.search_query {
            self.search_query = query;
        }
        if let Some(commodities) = update.selected_commodities {
            self.selected_commodities = commodities;
        }
        if let Some(countries) = update.selected_countries {
            self.selected_countries = countries;
        }
        if let Some(asset_types) = update.selected_asset_types {
            self.selected_asset_types = asset_types;
        }
    }

    /// Returns a copy with `update` applied.
    #[must_use]
    pub fn with(mut self, update: FilterUpdate) -> Self {
        self.update(update);
        self
    }

    /// Clears every dimension.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Adds `value` to the dimension's set if absent, removes it otherwise.
    /// Returns `true` if the value is selected afterwards.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) -> bool {
        let set = match dimension {
            FilterDimension::Commodity => &mut self.selected_commodities,
            FilterDimension::Country => &mut self.selected_countries,
            FilterDimension::AssetType => &mut self.selected_asset_types,
        };
        if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        }
    }
}

impl FilterUpdate {
    /// Update that replaces only the search query.
    #[must_use]
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search_query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Update that replaces only the commodity selection.
    #[must_use]
    pub fn commodities<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_commodities: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Update that replaces only the country selection.
    #[must_use]
    pub fn countries<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_countries: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Update that replaces only the asset type selection.
    #[must_use]
    pub fn asset_types<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_asset_types: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }
}
