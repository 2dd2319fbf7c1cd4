//! Marker color lookup for the rendering layer.
//!
//! Each [`ColorScheme`] keys a mine on one attribute and maps it to a hex
//! color. Lookups try an exact match first, then fall back to the first
//! table entry that contains (or is contained in) the value.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::Mine;

/// Which attribute drives marker color.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ColorScheme {
    /// Color by primary commodity
    #[default]
    Commodity,
    /// Color by (first) asset type
    AssetType,
    /// Color by confidence factor
    Confidence,
}

impl ColorScheme {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Commodity, Self::AssetType, Self::Confidence]
    }

    /// Legend entries for this scheme, in display order.
    #[must_use]
    pub const fn legend(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Commodity => COMMODITY_COLORS,
            Self::AssetType => ASSET_TYPE_COLORS,
            Self::Confidence => CONFIDENCE_COLORS,
        }
    }
}

/// Fallback color for missing values.
pub const UNKNOWN_COLOR: &str = "#95A5A6";

/// Commodity colors for commodities outside the table.
pub const OTHER_COMMODITY_COLOR: &str = "#7F8C8D";

const COMMODITY_COLORS: &[(&str, &str)] = &[
    // Precious
    ("gold", "#FFD700"),
    ("silver", "#C0C0C0"),
    ("platinum", "#E5E4E2"),
    ("diamond", "#B9F2FF"),
    // Base
    ("copper", "#B87333"),
    ("iron ore", "#8B4513"),
    ("zinc", "#7F8C8D"),
    ("lead", "#5D6D7E"),
    ("nickel", "#A8E6CF"),
    ("tin", "#AAB7B8"),
    ("aluminium", "#BDC3C7"),
    ("bauxite", "#E67E22"),
    // Energy
    ("coal", "#2C3E50"),
    ("thermal coal", "#34495E"),
    ("metallurgical coal", "#1C2833"),
    ("uranium", "#7FFF00"),
    ("oil sands", "#8B4513"),
    // Industrial
    ("lithium", "#9B59B6"),
    ("cobalt", "#3498DB"),
    ("rare earths", "#E74C3C"),
    ("phosphate", "#16A085"),
    ("potash", "#F39C12"),
    // Other
    ("molybdenum", "#884EA0"),
    ("manganese", "#784212"),
    ("chromium", "#85929E"),
    ("vanadium", "#641E16"),
    ("tungsten", "#4A235A"),
    // Placeholders some records carry literally
    ("unknown", UNKNOWN_COLOR),
    ("other", OTHER_COMMODITY_COLOR),
];

const ASSET_TYPE_COLORS: &[(&str, &str)] = &[
    ("Mine", "#00D9FF"),
    ("Smelter", "#FF6B6B"),
    ("Refinery", "#4ECDC4"),
    ("Plant", "#45B7D1"),
    ("Steel Plant", "#96CEB4"),
    ("Processing", "#FFEAA7"),
    ("Mill", "#DDA0DD"),
];

const CONFIDENCE_COLORS: &[(&str, &str)] = &[
    ("High", "#27AE60"),
    ("Moderate", "#F39C12"),
    ("Very Low", "#E74C3C"),
];

fn exact(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, c)| *c)
}

/// Color for a commodity name. Matching is case-insensitive.
#[must_use]
pub fn commodity_color(commodity: Option<&str>) -> &'static str {
    let Some(commodity) = commodity else {
        return UNKNOWN_COLOR;
    };
    let normalized = commodity.trim().to_lowercase();
    if normalized.is_empty() {
        return UNKNOWN_COLOR;
    }

    exact(COMMODITY_COLORS, &normalized)
        .or_else(|| {
            COMMODITY_COLORS
                .iter()
                .find(|(key, _)| normalized.contains(key) || key.contains(normalized.as_str()))
                .map(|(_, color)| *color)
        })
        .unwrap_or(OTHER_COMMODITY_COLOR)
}

/// Color for an asset type. Combined values use their first constituent.
#[must_use]
pub fn asset_type_color(asset_type: Option<&str>) -> &'static str {
    let Some(primary) = asset_type
        .and_then(|raw| raw.split(crate::ASSET_TYPE_SEPARATORS).next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return UNKNOWN_COLOR;
    };

    exact(ASSET_TYPE_COLORS, primary)
        .or_else(|| {
            let lowered = primary.to_lowercase();
            ASSET_TYPE_COLORS
                .iter()
                .find(|(key, _)| lowered.contains(&key.to_lowercase()))
                .map(|(_, color)| *color)
        })
        .unwrap_or(UNKNOWN_COLOR)
}

/// Color for a confidence label.
#[must_use]
pub fn confidence_color(confidence: Option<&str>) -> &'static str {
    confidence
        .and_then(|c| exact(CONFIDENCE_COLORS, c))
        .unwrap_or(UNKNOWN_COLOR)
}

/// Marker color for `mine` under `scheme`.
#[must_use]
pub fn mine_color(mine: &Mine, scheme: ColorScheme) -> &'static str {
    match scheme {
        ColorScheme::Commodity => commodity_color(mine.primary_commodity()),
        ColorScheme::AssetType => asset_type_color(mine.asset_type()),
        ColorScheme::Confidence => confidence_color(mine.confidence_label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commodity_exact_match_is_case_insensitive() {
        assert_eq!(commodity_color(Some("Gold")), "#FFD700");
        assert_eq!(commodity_color(Some(" THERMAL COAL ")), "#34495E");
    }

    #[test]
    fn commodity_partial_match_uses_table_order() {
        // "coal" precedes "thermal coal" in the table
        assert_eq!(commodity_color(Some("coking coal")), "#2C3E50");
    }

    #[test]
    fn commodity_fallbacks() {
        assert_eq!(commodity_color(None), UNKNOWN_COLOR);
        assert_eq!(commodity_color(Some("")), UNKNOWN_COLOR);
        assert_eq!(commodity_color(Some("graphite")), OTHER_COMMODITY_COLOR);
    }

    #[test]
    fn literal_placeholder_commodities() {
        assert_eq!(commodity_color(Some("Unknown")), UNKNOWN_COLOR);
        assert_eq!(commodity_color(Some("other")), OTHER_COMMODITY_COLOR);
    }

    #[test]
    fn asset_type_uses_first_constituent() {
        assert_eq!(asset_type_color(Some("Smelter;Mine")), "#FF6B6B");
        assert_eq!(asset_type_color(Some("Refinery / Plant")), "#4ECDC4");
    }

    #[test]
    fn asset_type_partial_match() {
        assert_eq!(asset_type_color(Some("Open Pit Mine")), "#00D9FF");
        assert_eq!(asset_type_color(Some("Port")), UNKNOWN_COLOR);
        assert_eq!(asset_type_color(None), UNKNOWN_COLOR);
    }

    #[test]
    fn confidence_colors() {
        assert_eq!(confidence_color(Some("Very Low")), "#E74C3C");
        assert_eq!(confidence_color(Some("very low")), UNKNOWN_COLOR);
        assert_eq!(confidence_color(None), UNKNOWN_COLOR);
    }

    #[test]
    fn scheme_parses_from_camel_case() {
        assert_eq!(
            "assetType".parse::<ColorScheme>().unwrap(),
            ColorScheme::AssetType
        );
        assert_eq!(ColorScheme::Confidence.to_string(), "confidence");
    }
}
