#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Viewer state for the mine map.
//!
//! [`ViewerState`] owns everything that changes while a user explores the
//! dataset: filter criteria, selection, hover, color scheme, and zoom detail.
//! Every derived view (active set, visible markers, statistics, exports) is
//! recomputed from that state and the immutable [`FeatureCollection`] on
//! request, so nothing can drift out of sync.

pub mod config;
pub mod render;

use mine_map_analytics_models::AggregateStats;
use mine_map_export::{ExportError, ExportFormat};
use mine_map_filter::RenderBudget;
use mine_map_mine_models::{
    FeatureId, FilterCriteria, FilterDimension, FilterUpdate, Mine, color::ColorScheme,
    color::mine_color,
};
use mine_map_store::FeatureCollection;

pub use config::{ConfigError, ViewerConfig};
pub use render::{MapEvent, Marker, RenderFrame, RenderLayer};

/// An export ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name.
    pub file_name: &'static str,
    /// Serialized content.
    pub bytes: Vec<u8>,
}

/// Interactive state of one viewer session.
#[derive(Debug, Clone)]
pub struct ViewerState {
    criteria: FilterCriteria,
    selected: Option<FeatureId>,
    hovered: Option<FeatureId>,
    color_scheme: ColorScheme,
    detail: f64,
    budget: RenderBudget,
    top_n: usize,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl ViewerState {
    /// Creates a fresh session from `config`, with no filters and nothing
    /// selected.
    #[must_use]
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            selected: None,
            hovered: None,
            color_scheme: config.color_scheme,
            detail: config.initial_detail,
            budget: config.render_budget.clone(),
            top_n: config.top_n,
        }
    }

    /// Current filter criteria.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Scheme used to color markers and the legend.
    #[must_use]
    pub const fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    /// Current zoom detail level. Higher values admit more markers.
    #[must_use]
    pub const fn detail(&self) -> f64 {
        self.detail
    }

    /// Length of each top-N ranking in [`Self::stats`].
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }

    /// Whether any filter is active.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.criteria.is_active()
    }

    /// Merges `update` into the current criteria.
    pub fn update_filters(&mut self, update: FilterUpdate) {
        log::debug!("Updating filters: {update:?}");
        self.criteria.update(update);
    }

    /// Toggles `value` in one filter dimension. Returns `true` if the value
    /// is now selected.
    pub fn toggle_filter(&mut self, dimension: FilterDimension, value: &str) -> bool {
        self.criteria.toggle(dimension, value)
    }

    /// Clears every filter. Selection and hover are kept.
    pub fn reset_filters(&mut self) {
        self.criteria.reset();
    }

    /// Switches the color scheme. Filters and selection are unaffected.
    pub const fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color_scheme = scheme;
    }

    /// Sets the zoom detail level directly, as a viewport change would.
    pub const fn set_detail(&mut self, detail: f64) {
        self.detail = detail;
    }

    /// Deselects the selected mine, if any.
    pub const fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Applies an interaction reported by the render layer. Ids that do not
    /// exist in `collection` are ignored.
    pub fn handle(&mut self, event: MapEvent, collection: &FeatureCollection) {
        match event {
            MapEvent::Click(id) => {
                if let Some(id) = checked(id, collection) {
                    self.selected = id;
                }
            }
            MapEvent::Hover(id) => {
                if let Some(id) = checked(id, collection) {
                    self.hovered = id;
                }
            }
            MapEvent::ViewportChanged { detail } => {
                log::trace!("Viewport detail changed to {detail}");
                self.detail = detail;
            }
        }
    }

    /// The selected mine, if any.
    #[must_use]
    pub fn selected<'a>(&self, collection: &'a FeatureCollection) -> Option<&'a Mine> {
        self.selected.and_then(|id| collection.get(id))
    }

    /// The hovered mine, if any.
    #[must_use]
    pub fn hovered<'a>(&self, collection: &'a FeatureCollection) -> Option<&'a Mine> {
        self.hovered.and_then(|id| collection.get(id))
    }

    /// Mines matching the current criteria, in dataset order. This is the
    /// whole dataset when no filter is active.
    #[must_use]
    pub fn active<'a>(&self, collection: &'a FeatureCollection) -> Vec<&'a Mine> {
        if self.criteria.is_active() {
            mine_map_filter::apply(collection, &self.criteria)
        } else {
            collection.iter().collect()
        }
    }

    /// The prefix of `active` that fits the render budget at the current
    /// detail level.
    #[must_use]
    pub fn visible<'v, 'a>(&self, active: &'v [&'a Mine]) -> &'v [&'a Mine] {
        self.budget.cap(active, self.detail)
    }

    /// Statistics over `active`.
    #[must_use]
    pub fn stats(&self, active: &[&Mine]) -> AggregateStats {
        mine_map_analytics::summarize(active.iter().copied(), self.top_n)
    }

    /// Serializes `active` in `format`, tagging the result with the current
    /// criteria. Returns `Ok(None)` when there is nothing to export.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if serialization fails.
    pub fn export(
        &self,
        format: ExportFormat,
        active: &[&Mine],
    ) -> Result<Option<ExportFile>, ExportError> {
        let filtered = self.is_filtered();
        let bytes = mine_map_export::export(format, active, Some(&self.criteria))?;
        Ok(bytes.map(|bytes| ExportFile {
            file_name: format.file_name(filtered),
            bytes,
        }))
    }

    /// Builds the frame for the current state.
    #[must_use]
    pub fn frame<'a>(&self, collection: &'a FeatureCollection) -> RenderFrame<'a> {
        let active = self.active(collection);
        let markers = self
            .visible(&active)
            .iter()
            .filter_map(|&mine| {
                collection.id_of(mine).map(|id| Marker {
                    id,
                    mine,
                    color: mine_color(mine, self.color_scheme),
                })
            })
            .collect::<Vec<_>>();

        RenderFrame {
            markers,
            total_matches: active.len(),
            selected: self.selected,
            hovered: self.hovered,
            filtered: self.is_filtered(),
        }
    }

    /// Builds the current frame and hands it to `layer`.
    pub fn render(&self, collection: &FeatureCollection, layer: &mut dyn RenderLayer) {
        layer.render(&self.frame(collection));
    }
}

/// `Some(id)` if the event's id is usable, `None` if it should be ignored.
fn checked(id: Option<FeatureId>, collection: &FeatureCollection) -> Option<Option<FeatureId>> {
    match id {
        Some(id) if collection.get(id).is_none() => {
            log::warn!(
                "Ignoring event for unknown feature {} (dataset has {})",
                id.0,
                collection.len()
            );
            None
        }
        id => Some(id),
    }
}
