use serde::{Deserialize, Serialize};

pub const DEFAULT_CLASS_NAME: &str = "marks";

/// Settings shared by [`crate::SvgRenderer`] and [`crate::SvgStringRenderer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgConfig {
    /// CSS color of a background rect behind the scene
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// `class` attribute of the root `svg` element
    #[serde(default = "default_class_name")]
    pub class_name: String,
}

fn default_class_name() -> String {
    DEFAULT_CLASS_NAME.to_string()
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            background: None,
            class_name: default_class_name(),
        }
    }
}
