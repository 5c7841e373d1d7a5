use serde::Deserialize;

/// Colors and sizes used by the canvas renderer. Colors are CSS-like strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub background: String,
    /// Dot grid spacing in world units.
    pub grid_spacing: f32,
    /// Below this on-screen spacing (px) the grid is hidden.
    pub grid_min_screen_spacing: f32,
    pub grid_color: String,
    pub selection_color: String,
    pub guide_color: String,
    pub measure_color: String,
    /// Resize handle edge length in screen pixels.
    pub handle_size: f32,
    pub placeholder_color: String,
    /// Maximum number of composited effect layers kept between frames.
    pub cache_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: "#F5F5F7".into(),
            grid_spacing: 20.0,
            grid_min_screen_spacing: 6.0,
            grid_color: "#D0D0D6".into(),
            selection_color: "#0D99FF".into(),
            guide_color: "#FF3B6B".into(),
            measure_color: "#FF3B6B".into(),
            handle_size: 8.0,
            placeholder_color: "#E2E2E8".into(),
            cache_capacity: 128,
        }
    }
}
