use fc_core::guides::GuideConfig;
use fc_core::viewport::{MAX_ZOOM, MIN_ZOOM};
use serde::Deserialize;

/// Editor tuning. Every field has a default, so a host may pass a partial
/// JSON object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum undo depth.
    pub history_limit: usize,
    /// Smallest width/height a resize may produce (world units).
    pub min_size: f32,
    /// Resize handle edge length in screen pixels.
    pub handle_size: f32,
    /// Marquee drags smaller than this on both axes count as a click.
    pub click_threshold: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Wheel zoom increment per notch.
    pub wheel_step: f32,
    /// Wheel zoom increment while ctrl/meta is held.
    pub precise_wheel_step: f32,
    /// Keyboard zoom factor.
    pub zoom_step: f32,
    pub nudge: f32,
    /// Nudge distance with shift held.
    pub nudge_large: f32,
    /// Side length for images whose dimensions cannot be read.
    pub placeholder_size: f32,
    pub guides: GuideConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            min_size: 16.0,
            handle_size: 8.0,
            click_threshold: 2.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_step: 0.1,
            precise_wheel_step: 0.01,
            zoom_step: 1.25,
            nudge: 1.0,
            nudge_large: 10.0,
            placeholder_size: 200.0,
            guides: GuideConfig::default(),
        }
    }
}
