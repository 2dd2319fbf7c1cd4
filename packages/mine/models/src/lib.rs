#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Mining site feature types shared across the mine map toolchain.
//!
//! A [`Mine`] is one point-located mining or processing site as loaded from
//! the `GeoJSON` dataset. Mines are immutable once loaded; every other crate
//! derives views from borrowed slices of them. [`FilterCriteria`] describes
//! which mines a view should contain.

pub mod color;
pub mod criteria;

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use criteria::{FilterCriteria, FilterDimension, FilterUpdate};

/// Separators that join several asset types into one combined value
/// (e.g. `"Mine;Smelter"`).
pub const ASSET_TYPE_SEPARATORS: &[char] = &[';', ',', '/'];

/// Position of a mine within the loaded dataset. Names are not unique, so
/// selection and hover state refer to mines by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub usize);

/// Data-quality indicator attached to a site record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ConfidenceFactor {
    /// Location and attributes are well established
    High,
    /// Partially verified record
    Moderate,
    /// Location is approximate or unverified
    #[serde(rename = "Very Low")]
    #[strum(serialize = "Very Low")]
    VeryLow,
}

impl ConfidenceFactor {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Moderate, Self::VeryLow]
    }
}

/// Attribute properties of a mining site, as they appear in the `GeoJSON`
/// `properties` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MineProperties {
    /// ICMM identifier. Not guaranteed to be present or unique.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Site name.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    /// Operating group or owner names.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_names: Option<String>,
    /// Country the site is located in.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub country: Option<String>,
    /// Main commodity produced.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_commodity: Option<String>,
    /// Second commodity produced.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub secondary_commodity: Option<String>,
    /// Free-form list of further commodities.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub other_commodities: Option<String>,
    /// Facility category, possibly several joined by `;`, `,` or `/`.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub asset_type: Option<String>,
    /// Raw confidence label (`High`, `Moderate`, `Very Low`).
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence_factor: Option<String>,
    /// Any other properties carried by the source record.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MineProperties {
    /// Replaces empty or whitespace-only string fields with `None` so that
    /// "present but blank" and "absent" behave the same everywhere.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.id,
            &mut self.name,
            &mut self.group_names,
            &mut self.country,
            &mut self.primary_commodity,
            &mut self.secondary_commodity,
            &mut self.other_commodities,
            &mut self.asset_type,
            &mut self.confidence_factor,
        ] {
            if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }
}

/// Accepts strings, numbers, and booleans as text so that a stray numeric
/// identifier does not reject the whole record. `null` becomes `None`, and
/// so do arrays and objects: the field is treated as absent and the record
/// is kept.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other @ (Value::Array(_) | Value::Object(_))) => {
            log::warn!("Ignoring non-scalar property value {other}");
            None
        }
    })
}

/// A feature object exactly as it appeared in the source document.
pub type SourceFeature = serde_json::Map<String, serde_json::Value>;

/// One mining or processing site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mine {
    /// Longitude in degrees, within `[-180, 180]`.
    pub longitude: f64,
    /// Latitude in degrees, within `[-90, 90]`.
    pub latitude: f64,
    /// Site attributes.
    pub properties: MineProperties,
    /// The unmodified source feature, kept so exports can pass it through.
    /// `None` for mines built in code.
    #[serde(skip)]
    pub source: Option<Arc<SourceFeature>>,
}

impl Mine {
    /// Creates a mine at the given coordinate.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64, properties: MineProperties) -> Self {
        Self {
            longitude,
            latitude,
            properties,
            source: None,
        }
    }

    /// Attaches the source feature this mine was parsed from.
    #[must_use]
    pub fn with_source(mut self, source: SourceFeature) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// The source feature, if this mine was loaded from a document.
    #[must_use]
    pub fn source(&self) -> Option<&SourceFeature> {
        self.source.as_deref()
    }

    /// Site name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.properties.name.as_deref()
    }

    /// Country, if any.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.properties.country.as_deref()
    }

    /// Primary commodity, if any.
    #[must_use]
    pub fn primary_commodity(&self) -> Option<&str> {
        self.properties.primary_commodity.as_deref()
    }

    /// Secondary commodity, if any.
    #[must_use]
    pub fn secondary_commodity(&self) -> Option<&str> {
        self.properties.secondary_commodity.as_deref()
    }

    /// Raw asset type string, if any.
    #[must_use]
    pub fn asset_type(&self) -> Option<&str> {
        self.properties.asset_type.as_deref()
    }

    /// Individual asset types of a combined value such as `"Mine;Smelter"`,
    /// trimmed and with empty parts dropped.
    pub fn asset_type_parts(&self) -> impl Iterator<Item = &str> {
        self.asset_type()
            .into_iter()
            .flat_map(|raw| raw.split(ASSET_TYPE_SEPARATORS))
            .map(str::trim)
            .filter(|part| !part.is_empty())
    }

    /// Raw confidence label, if any.
    #[must_use]
    pub fn confidence_label(&self) -> Option<&str> {
        self.properties.confidence_factor.as_deref()
    }

    /// Parsed confidence factor. Unrecognized labels yield `None`.
    #[must_use]
    pub fn confidence(&self) -> Option<ConfidenceFactor> {
        self.confidence_label()?.parse().ok()
    }

    /// Returns `true` if both coordinates are finite and within the valid
    /// longitude/latitude ranges.
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        is_valid_coordinate(self.longitude, self.latitude)
    }
}

/// Returns `true` if `(longitude, latitude)` is a finite coordinate within
/// `[-180, 180]` x `[-90, 90]`.
#[must_use]
pub fn is_valid_coordinate(longitude: f64, latitude: f64) -> bool {
    longitude.is_finite()
        && latitude.is_finite()
        && (-180.0..=180.0).contains(&longitude)
        && (-90.0..=90.0).contains(&latitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine_with_asset(asset: &str) -> Mine {
        Mine::new(
            0.0,
            0.0,
            MineProperties {
                asset_type: Some(asset.to_string()),
                ..MineProperties::default()
            },
        )
    }

    #[test]
    fn parses_confidence_labels() {
        assert_eq!(
            "Very Low".parse::<ConfidenceFactor>().unwrap(),
            ConfidenceFactor::VeryLow
        );
        assert_eq!(ConfidenceFactor::High.to_string(), "High");
        assert!("Unknown".parse::<ConfidenceFactor>().is_err());
    }

    #[test]
    fn confidence_serializes_with_space() {
        let json = serde_json::to_string(&ConfidenceFactor::VeryLow).unwrap();
        assert_eq!(json, "\"Very Low\"");
    }

    #[test]
    fn splits_combined_asset_types() {
        let mine = mine_with_asset("Mine; Smelter/Refinery,,Plant");
        let parts: Vec<&str> = mine.asset_type_parts().collect();
        assert_eq!(parts, vec!["Mine", "Smelter", "Refinery", "Plant"]);
    }

    #[test]
    fn missing_asset_type_has_no_parts() {
        let mine = Mine::new(0.0, 0.0, MineProperties::default());
        assert_eq!(mine.asset_type_parts().count(), 0);
    }

    #[test]
    fn normalizes_blank_fields() {
        let props = MineProperties {
            name: Some("Escondida".to_string()),
            country: Some("   ".to_string()),
            secondary_commodity: Some(String::new()),
            ..MineProperties::default()
        }
        .normalized();
        assert_eq!(props.name.as_deref(), Some("Escondida"));
        assert!(props.country.is_none());
        assert!(props.secondary_commodity.is_none());
    }

    #[test]
    fn deserializes_camel_case_properties_and_keeps_extras() {
        let props: MineProperties = serde_json::from_value(serde_json::json!({
            "name": "Grasberg",
            "primaryCommodity": "Copper",
            "confidenceFactor": "High",
            "operator": "PTFI"
        }))
        .unwrap();
        assert_eq!(props.primary_commodity.as_deref(), Some("Copper"));
        assert_eq!(props.confidence_factor.as_deref(), Some("High"));
        assert_eq!(
            props.extra.get("operator").and_then(|v| v.as_str()),
            Some("PTFI")
        );
    }

    #[test]
    fn accepts_numeric_identifiers() {
        let props: MineProperties = serde_json::from_value(serde_json::json!({
            "id": 1042,
            "name": null,
            "country": "Chile"
        }))
        .unwrap();
        assert_eq!(props.id.as_deref(), Some("1042"));
        assert!(props.name.is_none());
        assert_eq!(props.country.as_deref(), Some("Chile"));
    }

    #[test]
    fn non_scalar_known_fields_are_treated_as_absent() {
        let props: MineProperties = serde_json::from_value(serde_json::json!({
            "name": "Kibali",
            "otherCommodities": ["Gold", "Silver"],
            "groupNames": { "operator": "Barrick" }
        }))
        .unwrap();
        assert_eq!(props.name.as_deref(), Some("Kibali"));
        assert!(props.other_commodities.is_none());
        assert!(props.group_names.is_none());
    }

    #[test]
    fn validates_coordinate_ranges() {
        assert!(is_valid_coordinate(-70.3, -24.2));
        assert!(is_valid_coordinate(180.0, -90.0));
        assert!(!is_valid_coordinate(180.5, 0.0));
        assert!(!is_valid_coordinate(0.0, 91.0));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
        assert!(!is_valid_coordinate(0.0, f64::INFINITY));
    }
}
