#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Serializes the active mine view for download.
//!
//! JSON export is a pretty-printed `GeoJSON` `FeatureCollection` with an
//! extra `metadata` member describing when and how the view was produced.
//! CSV export is a flat table with every data field quoted. Both are no-ops
//! (`Ok(None)`) for an empty view.

use chrono::{DateTime, SecondsFormat, Utc};
use mine_map_mine_models::{FilterCriteria, Mine, SourceFeature};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// Column header of the CSV export.
pub const CSV_HEADER: [&str; 8] = [
    "Name",
    "Country",
    "Primary Commodity",
    "Secondary Commodity",
    "Asset Type",
    "Confidence",
    "Latitude",
    "Longitude",
];

/// Errors that can occur during export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the output buffer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed `GeoJSON` with metadata
    Json,
    /// Quoted comma-separated values
    Csv,
}

impl ExportFormat {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Json, Self::Csv]
    }

    /// Download file name for this format.
    #[must_use]
    pub const fn file_name(self, filtered: bool) -> &'static str {
        match (self, filtered) {
            (Self::Json, false) => "mines_data.json",
            (Self::Json, true) => "mines_data_filtered.json",
            (Self::Csv, false) => "mines_data.csv",
            (Self::Csv, true) => "mines_data_filtered.csv",
        }
    }
}

/// Describes how an export was produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata<'a> {
    /// Export time, RFC 3339 with millisecond precision.
    pub exported: String,
    /// Whether a filter was active.
    pub filtered: bool,
    /// Number of exported mines.
    pub total_records: usize,
    /// The active filter, or `null` when unfiltered.
    pub filters: Option<&'a FilterCriteria>,
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<ExportFeature<'a>>,
    metadata: ExportMetadata<'a>,
}

/// A loaded mine passes its source feature through untouched; a mine built
/// in code is written from its parsed fields.
#[derive(Serialize)]
#[serde(untagged)]
enum ExportFeature<'a> {
    Source(&'a SourceFeature),
    Built(geojson::Feature),
}

fn to_feature(mine: &Mine) -> Result<ExportFeature<'_>, ExportError> {
    if let Some(source) = mine.source() {
        return Ok(ExportFeature::Source(source));
    }

    let properties = match serde_json::to_value(&mine.properties)? {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    };

    Ok(ExportFeature::Built(geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
            mine.longitude,
            mine.latitude,
        ]))),
        id: None,
        properties,
        foreign_members: None,
    }))
}

/// Exports `mines` as JSON, stamped with the current time.
///
/// `criteria` is recorded in the metadata when it is active; an inactive or
/// absent filter marks the export as unfiltered.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_json(
    mines: &[&Mine],
    criteria: Option<&FilterCriteria>,
) -> Result<Option<Vec<u8>>, ExportError> {
    to_json_at(mines, criteria, Utc::now())
}

/// Like [`to_json`], with an explicit export timestamp.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_json_at(
    mines: &[&Mine],
    criteria: Option<&FilterCriteria>,
    exported_at: DateTime<Utc>,
) -> Result<Option<Vec<u8>>, ExportError> {
    if mines.is_empty() {
        log::debug!("Nothing to export");
        return Ok(None);
    }

    let criteria = criteria.filter(|c| c.is_active());
    let features = mines
        .iter()
        .map(|mine| to_feature(mine))
        .collect::<Result<Vec<_>, _>>()?;

    let document = ExportDocument {
        kind: "FeatureCollection",
        features,
        metadata: ExportMetadata {
            exported: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            filtered: criteria.is_some(),
            total_records: mines.len(),
            filters: criteria,
        },
    };

    let bytes = serde_json::to_vec_pretty(&document)?;
    log::info!("Exported {} mines as JSON ({} bytes)", mines.len(), bytes.len());
    Ok(Some(bytes))
}

/// Exports `mines` as CSV: an unquoted header line followed by one fully
/// quoted row per mine. Missing fields are empty strings.
///
/// # Errors
///
/// Returns [`ExportError`] if writing a record fails.
pub fn to_csv(mines: &[&Mine]) -> Result<Option<Vec<u8>>, ExportError> {
    if mines.is_empty() {
        log::debug!("Nothing to export");
        return Ok(None);
    }

    let mut buffer = CSV_HEADER.join(",").into_bytes();
    buffer.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(buffer);

    for mine in mines {
        let latitude = mine.latitude.to_string();
        let longitude = mine.longitude.to_string();
        writer.write_record([
            mine.name().unwrap_or_default(),
            mine.country().unwrap_or_default(),
            mine.primary_commodity().unwrap_or_default(),
            mine.secondary_commodity().unwrap_or_default(),
            mine.asset_type().unwrap_or_default(),
            mine.confidence_label().unwrap_or_default(),
            latitude.as_str(),
            longitude.as_str(),
        ])?;
    }

    let mut bytes = writer.into_inner().map_err(|e| e.into_error())?;
    // Rows are newline-separated, not newline-terminated.
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    log::info!("Exported {} mines as CSV ({} bytes)", mines.len(), bytes.len());
    Ok(Some(bytes))
}

/// Exports `mines` in `format`. See [`to_json`] and [`to_csv`].
///
/// # Errors
///
/// Returns [`ExportError`] if serialization fails.
pub fn export(
    format: ExportFormat,
    mines: &[&Mine],
    criteria: Option<&FilterCriteria>,
) -> Result<Option<Vec<u8>>, ExportError> {
    match format {
        ExportFormat::Json => to_json(mines, criteria),
        ExportFormat::Csv => to_csv(mines),
    }
}
