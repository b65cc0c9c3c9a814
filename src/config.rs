//! Editor tuning constants.
//!
//! The node footprint is fixed: rendering, area selection, fit-to-screen and
//! group clamping all use [`NODE_WIDTH`] x [`NODE_HEIGHT`]. Everything else
//! lives in [`EditorConfig`], whose defaults reproduce the canvas the
//! diagrams were authored against. Hosts can deserialize an override from
//! JSON or adjust single values through the setters on
//! [`Editor`](crate::Editor).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Width of a node's render footprint in world units.
pub const NODE_WIDTH: f32 = 160.0;
/// Height of a node's render footprint in world units.
pub const NODE_HEIGHT: f32 = 80.0;
/// Spacing of the snap grid.
pub const GRID_SIZE: f32 = 20.0;
/// Smallest width a group can be resized to.
pub const MIN_GROUP_WIDTH: f32 = 200.0;
/// Smallest height a group can be resized to.
pub const MIN_GROUP_HEIGHT: f32 = 150.0;
/// Lower zoom bound.
pub const MIN_ZOOM: f32 = 0.25;
/// Upper zoom bound.
pub const MAX_ZOOM: f32 = 2.0;
/// Scale change per zoom button press or wheel notch.
pub const ZOOM_STEP: f32 = 0.1;
/// Distance control points sit from their anchor.
pub const BEZIER_OFFSET: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub grid_size: f32,
    pub min_group_width: f32,
    pub min_group_height: f32,
    /// Height reserved for the group title bar.
    pub group_header: f32,
    /// Inset kept between a member node and the group border.
    pub group_margin: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub bezier_offset: f32,
    /// Padding added around the content by fit-to-screen.
    pub fit_padding: f32,
    /// Area selections smaller than this in both axes count as a click.
    pub click_threshold: f32,
    /// Pick radius for anchor handles, in screen pixels.
    pub anchor_hit_radius: f32,
    /// Pick radius for group resize handles, in screen pixels.
    pub handle_hit_radius: f32,
    /// Pick distance for edges, in screen pixels.
    pub edge_hover_distance: f32,
    pub edge_hit_samples: usize,
    /// Quiet period before a debounced save fires, in milliseconds.
    pub save_debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            min_group_width: MIN_GROUP_WIDTH,
            min_group_height: MIN_GROUP_HEIGHT,
            group_header: 60.0,
            group_margin: 10.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            bezier_offset: BEZIER_OFFSET,
            fit_padding: 80.0,
            click_threshold: 5.0,
            anchor_hit_radius: 8.0,
            handle_hit_radius: 6.0,
            edge_hover_distance: 6.0,
            edge_hit_samples: 20,
            save_debounce_ms: 500,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON override; missing keys keep defaults.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_constants() {
        let config = EditorConfig::default();
        assert_eq!(config.grid_size, 20.0);
        assert_eq!(config.save_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_minimum_group_fits_one_node() {
        // interior must never be empty for a minimum-size group
        let c = EditorConfig::default();
        assert!(c.min_group_width >= 2.0 * c.group_margin + NODE_WIDTH);
        assert!(c.min_group_height >= c.group_header + NODE_HEIGHT + c.group_margin);
    }

    #[test]
    fn test_partial_json_override() {
        let config = EditorConfig::from_json(r#"{ "gridSize": 10, "saveDebounceMs": 250 }"#).unwrap();
        assert_eq!(config.grid_size, 10.0);
        assert_eq!(config.save_debounce_ms, 250);
        assert_eq!(config.min_group_width, MIN_GROUP_WIDTH);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(EditorConfig::from_json("{ nope").is_err());
    }
}
