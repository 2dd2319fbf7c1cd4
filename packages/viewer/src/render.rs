//! The boundary between viewer state and whatever draws the map.
//!
//! A [`RenderLayer`] receives a [`RenderFrame`] describing the markers to
//! draw and reports user interaction back as [`MapEvent`]s. The viewer never
//! depends on a concrete map engine.

use mine_map_mine_models::{FeatureId, Mine};

/// An interaction reported by the render layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// A click on a marker, or on empty map when `None`.
    Click(Option<FeatureId>),
    /// The pointer entered a marker, or left all markers when `None`.
    Hover(Option<FeatureId>),
    /// The visible region changed to a new detail (zoom) level.
    ViewportChanged {
        /// New detail level.
        detail: f64,
    },
}

/// A single marker to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker<'a> {
    /// Dataset position, echoed back in [`MapEvent`]s.
    pub id: FeatureId,
    /// The mine at this marker.
    pub mine: &'a Mine,
    /// Hex fill color under the active color scheme.
    pub color: &'static str,
}

/// Everything a render layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame<'a> {
    /// Markers to draw, already capped by the render budget.
    pub markers: Vec<Marker<'a>>,
    /// Number of mines matching the filters before the cap.
    pub total_matches: usize,
    /// Currently selected mine.
    pub selected: Option<FeatureId>,
    /// Currently hovered mine.
    pub hovered: Option<FeatureId>,
    /// Whether any filter is active.
    pub filtered: bool,
}

impl RenderFrame<'_> {
    /// Whether the frame should show a "no results" overlay.
    #[must_use]
    pub const fn no_results(&self) -> bool {
        self.total_matches == 0
    }

    /// Whether the render budget hid some matching mines.
    #[must_use]
    pub const fn is_capped(&self) -> bool {
        self.markers.len() < self.total_matches
    }
}

/// Something that can draw a [`RenderFrame`].
pub trait RenderLayer {
    /// Draws `frame`, replacing whatever was drawn before.
    fn render(&mut self, frame: &RenderFrame<'_>);
}
