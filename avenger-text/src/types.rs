use avenger_common::format::fmt_num;
use avenger_common::types::{ImageAlign, ImageBaseline};
use ordered_float::OrderedFloat;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{IntoStaticStr, VariantNames};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, VariantNames, IntoStaticStr)]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Value of the SVG `text-anchor` attribute
    pub fn anchor(&self) -> &'static str {
        match self {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        }
    }

    /// Horizontal shift from the anchor to the left edge of text of width `w`
    pub fn offset(&self, w: f64) -> f64 {
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => -w / 2.0,
            TextAlign::Right => -w,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, VariantNames)]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "snake_case")]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Top,
    Middle,
    Bottom,
}

impl TextBaseline {
    /// Fraction of the font size the glyphs move down from the anchor
    pub fn offset_fraction(&self) -> f64 {
        match self {
            TextBaseline::Alphabetic => 0.0,
            TextBaseline::Top => 0.93,
            TextBaseline::Middle => 0.30,
            TextBaseline::Bottom => -0.21,
        }
    }
}

impl From<TextAlign> for ImageAlign {
    fn from(value: TextAlign) -> Self {
        match value {
            TextAlign::Left => ImageAlign::Left,
            TextAlign::Center => ImageAlign::Center,
            TextAlign::Right => ImageAlign::Right,
        }
    }
}

/// Images have no alphabetic baseline, it places them like `top`
impl From<TextBaseline> for ImageBaseline {
    fn from(value: TextBaseline) -> Self {
        match value {
            TextBaseline::Alphabetic | TextBaseline::Top => ImageBaseline::Top,
            TextBaseline::Middle => ImageBaseline::Middle,
            TextBaseline::Bottom => ImageBaseline::Bottom,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, VariantNames)]
#[cfg_attr(feature = "serde", serde(untagged))]
#[strum(serialize_all = "snake_case")]
pub enum FontWeight {
    Name(FontWeightNameSpec),
    Number(f32),
}

impl FontWeight {
    /// CSS representation used in font strings and `font-weight` styles
    pub fn to_css(&self) -> String {
        match self {
            FontWeight::Name(name) => name.as_str().to_string(),
            FontWeight::Number(n) => fmt_num(*n as f64),
        }
    }

    /// Numeric weight on the 100-900 scale
    pub fn to_number(&self) -> f32 {
        match self {
            FontWeight::Name(FontWeightNameSpec::Normal) => 400.0,
            FontWeight::Name(FontWeightNameSpec::Bold) => 700.0,
            FontWeight::Name(FontWeightNameSpec::Lighter) => 300.0,
            FontWeight::Name(FontWeightNameSpec::Bolder) => 800.0,
            FontWeight::Number(n) => *n,
        }
    }
}

impl std::hash::Hash for FontWeight {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Self::Name(spec) => spec.hash(state),
            Self::Number(num) => OrderedFloat::from(*num).hash(state),
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::Name(FontWeightNameSpec::Normal)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, VariantNames, IntoStaticStr)]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "snake_case")]
pub enum FontWeightNameSpec {
    #[default]
    Normal,
    Bold,
    Lighter,
    Bolder,
}

impl FontWeightNameSpec {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, VariantNames, IntoStaticStr)]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}
