#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derives filtered views of the mine dataset.
//!
//! [`apply`] narrows a sequence of mines by [`FilterCriteria`], returning a
//! new borrowed view that preserves the input order. The dataset itself is
//! never touched. [`budget`] caps the size of a view for rendering, and
//! [`facets`] lists the values each filter dimension can take.

pub mod budget;

use std::collections::BTreeSet;

use mine_map_mine_models::{FilterCriteria, Mine};
use serde::Serialize;

pub use budget::{BudgetTier, RenderBudget};

/// Returns the mines matching `criteria`, in input order.
///
/// The predicates run in a fixed order (search, commodities, countries,
/// asset types), each narrowing the previous result. With all-empty
/// criteria the result is the whole input. Missing optional fields never
/// match an active dimension.
#[must_use]
pub fn apply<'a, I>(mines: I, criteria: &FilterCriteria) -> Vec<&'a Mine>
where
    I: IntoIterator<Item = &'a Mine>,
{
    let mut view: Vec<&Mine> = mines.into_iter().collect();
    let total = view.len();

    if !criteria.search_query.is_empty() {
        let query = criteria.search_query.to_lowercase();
        view.retain(|mine| matches_search(mine, &query));
    }

    if !criteria.selected_commodities.is_empty() {
        view.retain(|mine| matches_commodity(mine, &criteria.selected_commodities));
    }

    if !criteria.selected_countries.is_empty() {
        view.retain(|mine| {
            mine.country()
                .is_some_and(|c| criteria.selected_countries.contains(c))
        });
    }

    if !criteria.selected_asset_types.is_empty() {
        view.retain(|mine| {
            mine.asset_type()
                .is_some_and(|a| criteria.selected_asset_types.contains(a))
        });
    }

    log::debug!("Filter matched {} of {total} mines", view.len());

    view
}

/// `query` must already be lowercased.
fn matches_search(mine: &Mine, query: &str) -> bool {
    [mine.name(), mine.country(), mine.primary_commodity()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(query))
}

fn matches_commodity(mine: &Mine, selected: &BTreeSet<String>) -> bool {
    [mine.primary_commodity(), mine.secondary_commodity()]
        .into_iter()
        .flatten()
        .any(|c| selected.contains(c))
}

/// Distinct values available for each filter dimension, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    /// Primary and secondary commodities.
    pub commodities: Vec<String>,
    /// Countries.
    pub countries: Vec<String>,
    /// Raw asset type values, combined types included as-is.
    pub asset_types: Vec<String>,
}

/// Collects the selectable values of every filter dimension.
#[must_use]
pub fn facets<'a, I>(mines: I) -> Facets
where
    I: IntoIterator<Item = &'a Mine>,
{
    let mut commodities = BTreeSet::new();
    let mut countries = BTreeSet::new();
    let mut asset_types = BTreeSet::new();

    for mine in mines {
        commodities.extend(mine.primary_commodity());
        commodities.extend(mine.secondary_commodity());
        countries.extend(mine.country());
        asset_types.extend(mine.asset_type());
    }

    Facets {
        commodities: commodities.into_iter().map(str::to_string).collect(),
        countries: countries.into_iter().map(str::to_string).collect(),
        asset_types: asset_types.into_iter().map(str::to_string).collect(),
    }
}


#[cfg(test)]
mod tests {
    use mine_map_mine_models::{FilterUpdate, MineProperties};

    use super::test_support::{mine, scenario};
    use super::*;

    fn names<'a>(view: &[&'a Mine]) -> Vec<&'a str> {
        view.iter().filter_map(|m| m.name()).collect()
    }

    fn is_subsequence(view: &[&Mine], all: &[Mine]) -> bool {
        let mut rest = all.iter();
        view.iter()
            .all(|v| rest.by_ref().any(|m| std::ptr::eq(m, *v)))
    }

    #[test]
    fn empty_criteria_is_identity() {
        let mines = scenario();
        let view = apply(&mines, &FilterCriteria::default());
        assert_eq!(view.len(), mines.len());
        assert!(view.iter().zip(&mines).all(|(v, m)| std::ptr::eq(*v, m)));
    }

    #[test]
    fn filters_by_country() {
        let mines = scenario();
        let criteria = FilterCriteria::default().with(FilterUpdate::countries(["Chile"]));
        assert_eq!(names(&apply(&mines, &criteria)), vec!["A", "C"]);
    }

    #[test]
    fn search_matches_commodity_case_insensitively() {
        let mines = scenario();
        let criteria = FilterCriteria::default().with(FilterUpdate::search("gold"));
        assert_eq!(names(&apply(&mines, &criteria)), vec!["B", "C"]);
    }

    #[test]
    fn search_matches_name_and_country_substrings() {
        let mines = scenario();
        let criteria = FilterCriteria::default().with(FilterUpdate::search("HIL"));
        assert_eq!(names(&apply(&mines, &criteria)), vec!["A", "C"]);
    }

    #[test]
    fn search_tolerates_missing_fields() {
        let mines = vec![
            Mine::new(0.0, 0.0, MineProperties::default()),
            mine("Goldstrike", None, None),
        ];
        let criteria = FilterCriteria::default().with(FilterUpdate::search("gold"));
        assert_eq!(names(&apply(&mines, &criteria)), vec!["Goldstrike"]);
    }

    #[test]
    fn commodity_matches_primary_or_secondary() {
        let mut with_secondary = mine("D", Some("Peru"), Some("Zinc"));
        with_secondary.properties.secondary_commodity = Some("Silver".to_string());
        let mines = vec![mine("A", None, Some("Silver")), with_secondary, mine("E", None, None)];

        let criteria = FilterCriteria::default().with(FilterUpdate::commodities(["Silver"]));
        assert_eq!(names(&apply(&mines, &criteria)), vec!["A", "D"]);
    }

    #[test]
    fn commodity_match_is_exact() {
        let mines = scenario();
        let criteria = FilterCriteria::default().with(FilterUpdate::commodities(["gold"]));
        assert!(apply(&mines, &criteria).is_empty());
    }

    #[test]
    fn asset_type_matches_raw_combined_value() {
        let mut combined = mine("S", None, None);
        combined.properties.asset_type = Some("Mine;Smelter".to_string());
        let mut plain = mine("M", None, None);
        plain.properties.asset_type = Some("Mine".to_string());
        let mines = vec![combined, plain, mine("N", None, None)];

        let criteria = FilterCriteria::default().with(FilterUpdate::asset_types(["Mine"]));
        assert_eq!(names(&apply(&mines, &criteria)), vec!["M"]);

        let criteria = FilterCriteria::default().with(FilterUpdate::asset_types(["Mine;Smelter"]));
        assert_eq!(names(&apply(&mines, &criteria)), vec!["S"]);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let mines = scenario();
        let criteria = FilterCriteria::default()
            .with(FilterUpdate::countries(["Chile"]))
            .with(FilterUpdate::commodities(["Gold"]));
        assert_eq!(names(&apply(&mines, &criteria)), vec!["C"]);
    }

    #[test]
    fn zero_matches_is_empty_not_everything() {
        let mines = scenario();
        let criteria = FilterCriteria::default().with(FilterUpdate::countries(["Canada"]));
        assert!(apply(&mines, &criteria).is_empty());
    }

    #[test]
    fn results_are_order_preserving_subsequences() {
        let mines = scenario();
        let all_criteria = [
            FilterCriteria::default().with(FilterUpdate::search("a")),
            FilterCriteria::default().with(FilterUpdate::commodities(["Gold", "Copper"])),
            FilterCriteria::default().with(FilterUpdate::countries(["Peru", "Chile"])),
            FilterCriteria::default().with(FilterUpdate::asset_types(["Mine"])),
        ];
        for criteria in &all_criteria {
            let view = apply(&mines, criteria);
            assert!(is_subsequence(&view, &mines), "{criteria:?}");
        }
    }

    #[test]
    fn adding_a_restriction_never_grows_the_result() {
        let mines = scenario();
        let base = FilterCriteria::default().with(FilterUpdate::search("a"));
        let base_len = apply(&mines, &base).len();
        let narrowed = base.with(FilterUpdate::countries(["Peru"]));
        assert!(apply(&mines, &narrowed).len() <= base_len);
    }

    #[test]
    fn widening_a_set_never_shrinks_the_result() {
        let mines = scenario();
        let one = FilterCriteria::default().with(FilterUpdate::countries(["Peru"]));
        let two = FilterCriteria::default().with(FilterUpdate::countries(["Peru", "Chile"]));
        assert!(apply(&mines, &two).len() >= apply(&mines, &one).len());
    }

    #[test]
    fn filters_a_prior_view() {
        let mines = scenario();
        let chile = apply(&mines, &FilterCriteria::default().with(FilterUpdate::countries(["Chile"])));
        let gold = apply(
            chile.iter().copied(),
            &FilterCriteria::default().with(FilterUpdate::search("gold")),
        );
        assert_eq!(names(&gold), vec!["C"]);
    }

    #[test]
    fn facets_are_sorted_and_distinct() {
        let mut mines = scenario();
        mines[0].properties.secondary_commodity = Some("Molybdenum".to_string());
        mines[1].properties.asset_type = Some("Mine;Smelter".to_string());
        mines[2].properties.asset_type = Some("Mine".to_string());

        let facets = facets(&mines);
        assert_eq!(facets.commodities, vec!["Copper", "Gold", "Molybdenum"]);
        assert_eq!(facets.countries, vec!["Chile", "Peru"]);
        assert_eq!(facets.asset_types, vec!["Mine", "Mine;Smelter"]);
    }

    #[test]
    fn facets_of_empty_input() {
        assert_eq!(facets(std::iter::empty()), Facets::default());
    }
}
