use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::VariantNames;

use crate::format::fmt_num;

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeCap::Butt => "butt",
            StrokeCap::Round => "round",
            StrokeCap::Square => "square",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrokeJoin {
    Bevel,
    #[default]
    Miter,
    Round,
}

impl StrokeJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeJoin::Bevel => "bevel",
            StrokeJoin::Miter => "miter",
            StrokeJoin::Round => "round",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImageAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl ImageAlign {
    /// Horizontal distance from the anchor to the left edge of an image of width `w`
    pub fn offset(&self, w: f64) -> f64 {
        match self {
            ImageAlign::Left => 0.0,
            ImageAlign::Center => w / 2.0,
            ImageAlign::Right => w,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImageBaseline {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl ImageBaseline {
    /// Vertical distance from the anchor to the top edge of an image of height `h`
    pub fn offset(&self, h: f64) -> f64 {
        match self {
            ImageBaseline::Top => 0.0,
            ImageBaseline::Middle => h / 2.0,
            ImageBaseline::Bottom => h,
        }
    }
}

#[derive(Default, Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AreaOrientation {
    #[default]
    Vertical,
    Horizontal,
}

/// A fill or stroke value: either a CSS color string or a gradient reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paint {
    Gradient(Gradient),
    Color(String),
}

impl Paint {
    pub fn color<S: Into<String>>(color: S) -> Self {
        Paint::Color(color.into())
    }

    pub fn gradient(&self) -> Option<&Gradient> {
        match self {
            Paint::Gradient(g) => Some(g),
            Paint::Color(_) => None,
        }
    }
}

impl From<&str> for Paint {
    fn from(value: &str) -> Self {
        Paint::Color(value.to_string())
    }
}

impl From<Gradient> for Paint {
    fn from(value: Gradient) -> Self {
        Paint::Gradient(value)
    }
}

impl Hash for Paint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Paint::Color(c) => c.hash(state),
            Paint::Gradient(g) => g.hash(state),
        }
    }
}

static GRADIENT_ID: AtomicUsize = AtomicUsize::new(0);

/// Reset the process-wide gradient id counter
pub fn reset_gradient_ids() {
    GRADIENT_ID.store(0, Ordering::SeqCst);
}

/// Linear gradient in the unit coordinate space of the painted item's bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub id: String,
    #[serde(default)]
    pub x1: f64,
    #[serde(default)]
    pub y1: f64,
    #[serde(default = "one")]
    pub x2: f64,
    #[serde(default)]
    pub y2: f64,
    #[serde(default)]
    pub stops: Vec<GradientStop>,
}

fn one() -> f64 {
    1.0
}

impl Gradient {
    /// Create a linear gradient with the next process-wide `gradient_N` id
    pub fn linear(p0: [f64; 2], p1: [f64; 2]) -> Self {
        let id = GRADIENT_ID.fetch_add(1, Ordering::SeqCst);
        Self {
            id: format!("gradient_{id}"),
            x1: p0[0],
            y1: p0[1],
            x2: p1[0],
            y2: p1[1],
            stops: Vec::new(),
        }
    }

    pub fn with_stop<S: Into<String>>(mut self, offset: f64, color: S) -> Self {
        self.stops.push(GradientStop {
            offset,
            color: color.into(),
        });
        self
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient::linear([0.0, 0.0], [1.0, 0.0])
    }
}

impl Hash for Gradient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .for_each(|v| OrderedFloat::from(*v).hash(state));
        self.stops.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}

impl Hash for GradientStop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        OrderedFloat::from(self.offset).hash(state);
        self.color.hash(state);
    }
}

/// Dash pattern given either as a numeric array or as an SVG style string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrokeDash {
    Array(Vec<f64>),
    String(String),
}

impl StrokeDash {
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            StrokeDash::Array(values) => values.clone(),
            StrokeDash::String(s) => s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter_map(|chunk| chunk.parse::<f64>().ok())
                .collect(),
        }
    }

    /// Value suitable for the `stroke-dasharray` attribute
    pub fn to_attr(&self) -> String {
        match self {
            StrokeDash::Array(values) => values.iter().map(|v| fmt_num(*v)).join(","),
            StrokeDash::String(s) => s.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_deserialize() {
        let paint: Paint = serde_json::from_str("\"steelblue\"").unwrap();
        assert_eq!(paint, Paint::color("steelblue"));

        let paint: Paint = serde_json::from_str(
            r#"{"id": "gradient_7", "stops": [{"offset": 0, "color": "red"}]}"#,
        )
        .unwrap();
        let gradient = paint.gradient().unwrap();
        assert_eq!(gradient.id, "gradient_7");
        assert_eq!(gradient.x2, 1.0);
        assert_eq!(gradient.stops.len(), 1);
    }

    #[test]
    fn test_gradient_ids_increment() {
        let a = Gradient::linear([0.0, 0.0], [1.0, 0.0]);
        let b = Gradient::linear([0.0, 0.0], [0.0, 1.0]);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("gradient_"));
    }

    #[test]
    fn test_stroke_dash() {
        let dash = StrokeDash::String("4, 2 1".to_string());
        assert_eq!(dash.to_vec(), vec![4.0, 2.0, 1.0]);

        let dash = StrokeDash::Array(vec![5.0, 2.5]);
        assert_eq!(dash.to_attr(), "5,2.5");
    }
}
