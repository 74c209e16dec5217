//! Resolved geometry and style fields of a single item.

use avenger_common::types::{AreaOrientation, Paint, StrokeCap, StrokeDash, StrokeJoin};
use avenger_common::format::fmt_num;
use avenger_text::metrics::FontSpec;
use avenger_text::types::{FontStyle, FontWeight, TextAlign, TextBaseline};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Every field an item may carry.
///
/// Serialization writes only the scene-file whitelist. Fields marked
/// `skip_serializing` are accepted on input and used for rendering and
/// interaction, but never written back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<TextBaseline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_cap: Option<StrokeCap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dash: Option<StrokeDash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dash_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orient: Option<AreaOrientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dx: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zindex: Option<i32>,
    /// Group items only: clip child marks to the group's width and height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<bool>,

    #[serde(skip_serializing)]
    pub stroke_join: Option<StrokeJoin>,
    #[serde(skip_serializing)]
    pub stroke_miter_limit: Option<f64>,
    #[serde(skip_serializing)]
    pub aspect: Option<bool>,
    #[serde(skip_serializing)]
    pub limit: Option<f64>,
    #[serde(skip_serializing)]
    pub ellipsis: Option<String>,
    #[serde(skip_serializing)]
    pub dir: Option<String>,
    #[serde(skip_serializing)]
    pub href: Option<String>,
    #[serde(skip_serializing)]
    pub tooltip: Option<String>,
    #[serde(skip_serializing)]
    pub cursor: Option<String>,
}

/// Accept strings, numbers, booleans and arrays for `text`
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.as_f64().map(fmt_num).unwrap_or_else(|| n.to_string())),
        Value::Array(values) => Some(
            values
                .iter()
                .map(|v| text_from_value(v).unwrap_or_default())
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

impl ItemProps {
    pub fn x(&self) -> f64 {
        self.x.unwrap_or(0.0)
    }

    pub fn y(&self) -> f64 {
        self.y.unwrap_or(0.0)
    }

    pub fn width(&self) -> f64 {
        self.width.unwrap_or(0.0)
    }

    pub fn height(&self) -> f64 {
        self.height.unwrap_or(0.0)
    }

    pub fn clips(&self) -> bool {
        self.clip == Some(true)
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }

    /// Only an explicit `false` excludes a point from lines and areas
    pub fn is_defined(&self) -> bool {
        self.defined != Some(false)
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width.unwrap_or(1.0)
    }

    /// Whether the item is stroked visibly enough to pad its bounds
    pub fn has_visible_stroke(&self) -> bool {
        self.stroke.is_some() && self.opacity != Some(0.0) && self.stroke_opacity != Some(0.0)
    }

    pub fn is_rtl(&self) -> bool {
        self.dir.as_deref() == Some("rtl")
    }

    pub fn font_spec(&self) -> FontSpec<'_> {
        FontSpec {
            family: self.font.as_deref(),
            size: self.font_size,
            style: self.font_style,
            variant: self.font_variant.as_deref(),
            weight: self.font_weight,
        }
    }
}
