//! Feature-count progress for dataset loads.
//!
//! A load reports in one fixed order: the file read, then `set_total` with
//! the number of features in the document, one `inc(1)` per feature turned
//! into a [`Mine`](mine_map_mine_models::Mine), and finally `finish` with
//! the loaded count or `finish_and_clear` when the load fails.

use std::sync::Arc;

/// Observer of a [`FeatureStore`](crate::FeatureStore) load.
///
/// Shared as an `Arc` into [`FeatureStore::load_path`](crate::FeatureStore::load_path),
/// so it must be `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// Number of features the document declares. Called once, before the
    /// first feature is converted.
    fn set_total(&self, total: u64);

    /// `delta` more features were converted.
    fn inc(&self, delta: u64);

    /// Describes the current load phase.
    fn set_message(&self, msg: String);

    /// The dataset is ready; `msg` reports how many mines were loaded.
    fn finish(&self, msg: String);

    /// The load failed and the previous dataset stays current.
    fn finish_and_clear(&self);
}

/// Discards load progress. Used by [`parse`](crate::parse) and in tests.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// A [`NullProgress`] ready to pass to `load_path`.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
