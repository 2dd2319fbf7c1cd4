#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory store for the mining site dataset.
//!
//! The dataset is a single `GeoJSON` `FeatureCollection` of `Point` features,
//! parsed once into an immutable [`FeatureCollection`]. [`FeatureStore`]
//! holds the current collection and only replaces it when a load succeeds,
//! so a failed reload never exposes a partial dataset.

pub mod progress;

use std::path::Path;
use std::sync::Arc;

use geojson::GeoJson;
use mine_map_mine_models::{FeatureId, Mine, MineProperties, is_valid_coordinate};

use crate::progress::ProgressCallback;

/// Errors that can occur while loading the dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a usable feature collection.
    #[error("Malformed input: {message}")]
    MalformedInput {
        /// Description of what was wrong with the input.
        message: String,
    },
}

impl LoadError {
    fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

/// The loaded dataset. Cheap to clone; the mines themselves are shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    mines: Arc<[Mine]>,
}

impl FeatureCollection {
    /// All mines, in dataset order.
    #[must_use]
    pub fn as_slice(&self) -> &[Mine] {
        &self.mines
    }

    /// Iterates over all mines in dataset order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mine> {
        self.mines.iter()
    }

    /// Number of mines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mines.len()
    }

    /// Returns `true` if the dataset has no mines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mines.is_empty()
    }

    /// Looks up a mine by its dataset position.
    #[must_use]
    pub fn get(&self, id: FeatureId) -> Option<&Mine> {
        self.mines.get(id.0)
    }

    /// Dataset position of a mine borrowed from this collection. Views hold
    /// references into the shared slice, so the position follows from the
    /// address. Returns `None` for mines that live elsewhere, even if equal.
    #[must_use]
    pub fn id_of(&self, mine: &Mine) -> Option<FeatureId> {
        let size = std::mem::size_of::<Mine>();
        let base = self.mines.as_ptr() as usize;
        let addr = std::ptr::from_ref(mine) as usize;
        let offset = addr.checked_sub(base)?;
        let index = offset / size;
        (offset % size == 0 && index < self.mines.len()).then_some(FeatureId(index))
    }
}

impl From<Vec<Mine>> for FeatureCollection {
    fn from(mines: Vec<Mine>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Mine;
    type IntoIter = std::slice::Iter<'a, Mine>;

    fn into_iter(self) -> Self::IntoIter {
        self.mines.iter()
    }
}

/// Parses a `GeoJSON` document into a [`FeatureCollection`].
///
/// # Errors
///
/// Returns [`LoadError::MalformedInput`] if the document is not a
/// `FeatureCollection`, or if any feature lacks a valid `Point` coordinate.
pub fn parse(raw: &str) -> Result<FeatureCollection, LoadError> {
    parse_with_progress(raw, &progress::NullProgress)
}

/// Like [`parse`], reporting one unit of progress per feature converted.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_progress(
    raw: &str,
    progress: &dyn ProgressCallback,
) -> Result<FeatureCollection, LoadError> {
    let geojson: GeoJson = raw
        .parse()
        .map_err(|e: geojson::Error| LoadError::malformed(e.to_string()))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(LoadError::malformed(
            "expected a GeoJSON FeatureCollection at the top level",
        ));
    };

    progress.set_total(collection.features.len() as u64);
    progress.set_message("Parsing features".to_string());

    let mut mines = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        mines.push(feature_to_mine(index, feature)?);
        progress.inc(1);
    }

    log::debug!("Parsed {} features", mines.len());

    Ok(FeatureCollection::from(mines))
}

fn feature_to_mine(index: usize, feature: geojson::Feature) -> Result<Mine, LoadError> {
    let source = match serde_json::to_value(&feature) {
        Ok(serde_json::Value::Object(source)) => source,
        Ok(_) => {
            return Err(LoadError::malformed(format!(
                "feature {index} is not an object"
            )));
        }
        Err(e) => return Err(LoadError::malformed(format!("feature {index}: {e}"))),
    };

    let Some(geometry) = feature.geometry else {
        return Err(LoadError::malformed(format!(
            "feature {index} has no geometry"
        )));
    };

    let geojson::Value::Point(position) = geometry.value else {
        return Err(LoadError::malformed(format!(
            "feature {index} is not a Point"
        )));
    };

    let [longitude, latitude, ..] = position.as_slice() else {
        return Err(LoadError::malformed(format!(
            "feature {index} lacks a coordinate pair"
        )));
    };
    let (longitude, latitude) = (*longitude, *latitude);

    if !is_valid_coordinate(longitude, latitude) {
        return Err(LoadError::malformed(format!(
            "feature {index} has out-of-range coordinate [{longitude}, {latitude}]"
        )));
    }

    let properties = match feature.properties {
        Some(props) => serde_json::from_value::<MineProperties>(serde_json::Value::Object(props))
            .map_err(|e| LoadError::malformed(format!("feature {index} properties: {e}")))?,
        None => MineProperties::default(),
    };

    Ok(Mine::new(longitude, latitude, properties.normalized()).with_source(source))
}

/// Holds the current dataset. Starts out not ready.
#[derive(Debug, Default)]
pub struct FeatureStore {
    collection: Option<FeatureCollection>,
}

impl FeatureStore {
    /// Creates an empty, not-ready store.
    #[must_use]
    pub const fn new() -> Self {
        Self { collection: None }
    }

    /// Returns `true` once a load has succeeded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.collection.is_some()
    }

    /// The current dataset, or `None` if nothing has loaded yet.
    #[must_use]
    pub const fn collection(&self) -> Option<&FeatureCollection> {
        self.collection.as_ref()
    }

    /// Parses `raw` and, on success, replaces the held dataset.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if parsing fails. The previously held dataset
    /// (if any) is left in place.
    pub fn load(&mut self, raw: &str) -> Result<&FeatureCollection, LoadError> {
        self.load_with_progress(raw, &progress::NullProgress)
    }

    /// Like [`FeatureStore::load`], reporting progress.
    ///
    /// # Errors
    ///
    /// See [`FeatureStore::load`].
    pub fn load_with_progress(
        &mut self,
        raw: &str,
        progress: &dyn ProgressCallback,
    ) -> Result<&FeatureCollection, LoadError> {
        match parse_with_progress(raw, progress) {
            Ok(collection) => {
                log::info!("Loaded {} mines", collection.len());
                Ok(&*self.collection.insert(collection))
            }
            Err(e) => {
                log::warn!("Dataset load failed, keeping previous data: {e}");
                Err(e)
            }
        }
    }

    /// Reads and loads the dataset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, or
    /// [`LoadError::MalformedInput`] if its contents are invalid. Either
    /// way the previously held dataset is kept.
    pub async fn load_path(
        &mut self,
        path: &Path,
        progress: Arc<dyn ProgressCallback>,
    ) -> Result<&FeatureCollection, LoadError> {
        log::info!("Reading dataset from {}", path.display());

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                progress.finish_and_clear();
                return Err(e.into());
            }
        };

        let result = self.load_with_progress(&raw, progress.as_ref());
        match &result {
            Ok(collection) => progress.finish(format!("Loaded {} mines", collection.len())),
            Err(_) => progress.finish_and_clear(),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-69.07, -24.27] },
                "properties": {
                    "id": "ICMM-1",
                    "name": "Escondida",
                    "country": "Chile",
                    "primaryCommodity": "Copper",
                    "assetType": "Mine",
                    "confidenceFactor": "High"
                }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [137.11, -4.05] },
                "properties": {
                    "name": "Grasberg",
                    "country": "Indonesia",
                    "primaryCommodity": "Copper",
                    "secondaryCommodity": "Gold",
                    "assetType": "Mine;Smelter",
                    "groupNames": ""
                }
            }
        ]
    }"#;

    fn feature_with_geometry(geometry: &str) -> String {
        format!(
            r#"{{"type":"FeatureCollection","features":[
                {{"type":"Feature","geometry":{geometry},"properties":{{"name":"X"}}}}
            ]}}"#
        )
    }

    #[test]
    fn parses_sample_collection() {
        let collection = parse(SAMPLE).unwrap();
        assert_eq!(collection.len(), 2);

        let first = collection.get(FeatureId(0)).unwrap();
        assert_eq!(first.name(), Some("Escondida"));
        assert!((first.longitude - -69.07).abs() < f64::EPSILON);
        assert!((first.latitude - -24.27).abs() < f64::EPSILON);

        let second = collection.get(FeatureId(1)).unwrap();
        assert_eq!(second.secondary_commodity(), Some("Gold"));
        assert!(second.properties.group_names.is_none());
    }

    #[test]
    fn rejects_non_collection_document() {
        let raw = r#"{"type":"Point","coordinates":[1.0,2.0]}"#;
        assert!(matches!(
            parse(raw),
            Err(LoadError::MalformedInput { .. })
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse("not json"),
            Err(LoadError::MalformedInput { .. })
        ));
    }

    #[test]
    fn rejects_missing_geometry() {
        let raw = feature_with_geometry("null");
        let err = parse(&raw).unwrap_err();
        assert!(err.to_string().contains("no geometry"), "{err}");
    }

    #[test]
    fn rejects_non_point_geometry() {
        let raw = feature_with_geometry(
            r#"{"type":"LineString","coordinates":[[0.0,0.0],[1.0,1.0]]}"#,
        );
        assert!(parse(&raw).is_err());
    }

    #[test]
    fn rejects_out_of_range_coordinate() {
        let raw = feature_with_geometry(r#"{"type":"Point","coordinates":[200.0,10.0]}"#);
        let err = parse(&raw).unwrap_err();
        assert!(err.to_string().contains("out-of-range"), "{err}");
    }

    #[test]
    fn keeps_features_with_non_scalar_properties() {
        let raw = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[29.6,3.1]},
             "properties":{"name":"Kibali","otherCommodities":["Gold","Silver"]}}
        ]}"#;
        let collection = parse(raw).unwrap();
        let mine = collection.get(FeatureId(0)).unwrap();
        assert_eq!(mine.name(), Some("Kibali"));
        assert!(mine.properties.other_commodities.is_none());

        let source_props = mine
            .source()
            .and_then(|f| f.get("properties"))
            .and_then(|p| p.get("otherCommodities"));
        assert_eq!(source_props, Some(&serde_json::json!(["Gold", "Silver"])));
    }

    #[test]
    fn keeps_source_feature_unmodified() {
        let raw = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","id":"f1",
             "geometry":{"type":"Point","coordinates":[1.5,2.5,300.0]},
             "properties":{"id":1042,"groupNames":"","name":"X"}}
        ]}"#;
        let collection = parse(raw).unwrap();
        let mine = collection.get(FeatureId(0)).unwrap();
        assert!(mine.properties.group_names.is_none());

        let source = mine.source().unwrap();
        assert_eq!(source["id"], "f1");
        assert_eq!(source["properties"]["id"], 1042);
        assert_eq!(source["properties"]["groupNames"], "");
        assert_eq!(source["geometry"]["coordinates"][2], 300.0);
    }

    #[test]
    fn accepts_empty_collection() {
        let collection = parse(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn store_starts_not_ready() {
        let store = FeatureStore::new();
        assert!(!store.is_ready());
        assert!(store.collection().is_none());
    }

    #[test]
    fn failed_load_keeps_previous_collection() {
        let mut store = FeatureStore::new();
        store.load(SAMPLE).unwrap();
        assert!(store.load("{}").is_err());
        assert_eq!(store.collection().map(FeatureCollection::len), Some(2));
    }

    #[test]
    fn failed_first_load_stays_not_ready() {
        let mut store = FeatureStore::new();
        assert!(store.load("[]").is_err());
        assert!(!store.is_ready());
    }

    #[test]
    fn reload_is_idempotent() {
        let mut store = FeatureStore::new();
        let first = store.load(SAMPLE).unwrap().clone();
        let second = store.load(SAMPLE).unwrap();
        assert_eq!(&first, second);
    }

    #[test]
    fn id_of_finds_borrowed_mine() {
        let collection = parse(SAMPLE).unwrap();
        let second = &collection.as_slice()[1];
        assert_eq!(collection.id_of(second), Some(FeatureId(1)));

        let copy = second.clone();
        assert_eq!(collection.id_of(&copy), None);
    }

    #[tokio::test]
    async fn load_path_reports_missing_file_as_io() {
        let mut store = FeatureStore::new();
        let path = std::env::temp_dir().join("mine_map_store_test_missing.geojson");
        let _ = std::fs::remove_file(&path);

        let result = store.load_path(&path, progress::null_progress()).await;
        assert!(matches!(result, Err(LoadError::Io(_))));
        assert!(!store.is_ready());
    }

    #[tokio::test]
    async fn load_path_reads_file() {
        let path = std::env::temp_dir().join("mine_map_store_test_sample.geojson");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut store = FeatureStore::new();
        let len = store
            .load_path(&path, progress::null_progress())
            .await
            .unwrap()
            .len();
        assert_eq!(len, 2);

        let _ = std::fs::remove_file(&path);
    }

    #[derive(Default)]
    struct Recorder(std::sync::Mutex<Vec<String>>);

    impl ProgressCallback for Recorder {
        fn set_total(&self, total: u64) {
            self.0.lock().unwrap().push(format!("total {total}"));
        }
        fn inc(&self, delta: u64) {
            self.0.lock().unwrap().push(format!("inc {delta}"));
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, msg: String) {
            self.0.lock().unwrap().push(msg);
        }
        fn finish_and_clear(&self) {
            self.0.lock().unwrap().push("cleared".to_string());
        }
    }

    #[tokio::test]
    async fn load_path_counts_features_then_finishes() {
        let path = std::env::temp_dir().join("mine_map_store_test_progress.geojson");
        std::fs::write(&path, SAMPLE).unwrap();

        let recorder = Arc::new(Recorder::default());
        let mut store = FeatureStore::new();
        store.load_path(&path, recorder.clone()).await.unwrap();
        assert_eq!(
            *recorder.0.lock().unwrap(),
            ["total 2", "inc 1", "inc 1", "Loaded 2 mines"]
        );

        std::fs::write(&path, "not json").unwrap();
        let recorder = Arc::new(Recorder::default());
        assert!(store.load_path(&path, recorder.clone()).await.is_err());
        assert_eq!(*recorder.0.lock().unwrap(), ["cleared"]);

        let _ = std::fs::remove_file(&path);
    }
}
