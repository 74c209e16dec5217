use serde::{Deserialize, Serialize};

/// Settings of a [`crate::CanvasRenderer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfig {
    /// CSS color painted behind the scene, transparent when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Physical pixels per scene unit
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: None,
            pixel_ratio: default_pixel_ratio(),
        }
    }
}
