use crate::types::{FontStyle, FontWeight};

#[cfg(feature = "cosmic-text")]
pub mod cosmic;

/// Core trait for text measurement functionality
pub trait TextMeasurer: Send + Sync {
    /// Measures the bounding dimensions for a text string with given configuration
    fn measure_text_bounds(&self, config: &TextMeasurementConfig) -> TextBounds;
}

/// Configuration needed for text measurement
#[derive(Debug, Clone)]
pub struct TextMeasurementConfig<'a> {
    /// The text string to measure
    pub text: &'a str,
    /// Font family name
    pub font: &'a str,
    /// Font size in pixels
    pub font_size: f64,
    /// Font weight (normal, bold, or numeric)
    pub font_weight: &'a FontWeight,
    /// Font style (normal, italic or oblique)
    pub font_style: &'a FontStyle,
}

/// Results from text measurement
#[derive(Debug, Clone, PartialEq)]
pub struct TextBounds {
    /// Total width of the text
    pub width: f64,
    /// Total height from top to bottom
    pub height: f64,
    /// Distance from top to baseline
    pub ascent: f64,
    /// Distance from bottom to baseline
    pub descent: f64,
    /// Distance from top to where the top of the next line would be
    pub line_height: f64,
}

impl TextBounds {
    pub fn empty(font_size: f64) -> Self {
        TextBounds {
            width: 0.0,
            height: font_size,
            ascent: font_size * 0.8,
            descent: font_size * 0.2,
            line_height: font_size * 1.2,
        }
    }
}

/// Measurer that needs no fonts: every character is assumed to be 0.8 ems wide
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateTextMeasurer;

impl EstimateTextMeasurer {
    pub fn new() -> Self {
        Self
    }
}

impl TextMeasurer for EstimateTextMeasurer {
    fn measure_text_bounds(&self, config: &TextMeasurementConfig) -> TextBounds {
        let chars = config.text.chars().count() as f64;
        TextBounds {
            width: (0.8 * chars * config.font_size).floor(),
            ..TextBounds::empty(config.font_size)
        }
    }
}

/// The most precise measurer compiled into this build
pub fn default_text_measurer() -> Box<dyn TextMeasurer> {
    #[cfg(feature = "cosmic-text")]
    {
        Box::new(crate::measurement::cosmic::CosmicTextMeasurer::new())
    }
    #[cfg(not(feature = "cosmic-text"))]
    {
        Box::new(EstimateTextMeasurer::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_width() {
        let config = TextMeasurementConfig {
            text: "Hello",
            font: "sans-serif",
            font_size: 11.0,
            font_weight: &FontWeight::default(),
            font_style: &FontStyle::default(),
        };
        let bounds = EstimateTextMeasurer::new().measure_text_bounds(&config);
        // 0.8 * 5 * 11 = 44
        assert_eq!(bounds.width, 44.0);
        assert_eq!(bounds.height, 11.0);
    }

    #[test]
    fn test_estimate_counts_chars_not_bytes() {
        let config = TextMeasurementConfig {
            text: "héllo…",
            font: "sans-serif",
            font_size: 10.0,
            font_weight: &FontWeight::default(),
            font_style: &FontStyle::default(),
        };
        let bounds = EstimateTextMeasurer::new().measure_text_bounds(&config);
        assert_eq!(bounds.width, 48.0);
    }
}
