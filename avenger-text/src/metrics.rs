//! Font strings, baseline offsets and width-limited truncation for text items.

use std::fmt;
use std::sync::Arc;

use avenger_common::format::fmt_num;

use crate::measurement::{EstimateTextMeasurer, TextMeasurementConfig, TextMeasurer};
use crate::types::{FontStyle, FontWeight, FontWeightNameSpec, TextBaseline};

pub const DEFAULT_FONT_SIZE: f64 = 11.0;
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
pub const DEFAULT_ELLIPSIS: &str = "\u{2026}";

/// Font fields of a text item, borrowed from the item
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FontSpec<'a> {
    pub family: Option<&'a str>,
    pub size: Option<f64>,
    pub style: Option<FontStyle>,
    pub variant: Option<&'a str>,
    pub weight: Option<FontWeight>,
}

impl FontSpec<'_> {
    /// Font size in pixels, 11 when unset
    pub fn height(&self) -> f64 {
        self.size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn family(&self) -> &str {
        match self.family {
            Some(family) if !family.is_empty() => family,
            _ => DEFAULT_FONT_FAMILY,
        }
    }

    /// CSS font shorthand: `style variant weight {size}px family`.
    ///
    /// With `quote`, double quotes in the family become single quotes so the
    /// value can sit inside a double-quoted attribute.
    pub fn to_css(&self, quote: bool) -> String {
        let mut out = String::new();
        if let Some(style) = self.style {
            out.push_str(style.as_str());
            out.push(' ');
        }
        if let Some(variant) = self.variant.filter(|v| !v.is_empty()) {
            out.push_str(variant);
            out.push(' ');
        }
        if let Some(weight) = self.weight.filter(|w| *w != FontWeight::Number(0.0)) {
            out.push_str(&weight.to_css());
            out.push(' ');
        }
        out.push_str(&fmt_num(self.height()));
        out.push_str("px ");
        if quote {
            out.push_str(&self.family().replace('"', "'"));
        } else {
            out.push_str(self.family());
        }
        out
    }
}

/// Round half towards positive infinity
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Vertical shift from the anchor to the drawn baseline
pub fn baseline_offset(baseline: Option<TextBaseline>, height: f64) -> f64 {
    let fraction = baseline.unwrap_or_default().offset_fraction();
    let offset = round_half_up(fraction * height);
    if offset == 0.0 {
        0.0
    } else {
        offset
    }
}

/// Owned font fields parsed back from a CSS font shorthand, as produced by
/// [`FontSpec::to_css`]
#[derive(Debug, Clone, PartialEq)]
pub struct CssFont {
    pub family: String,
    pub size: f64,
    pub style: FontStyle,
    pub weight: FontWeight,
}

impl Default for CssFont {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: 10.0,
            style: FontStyle::Normal,
            weight: FontWeight::default(),
        }
    }
}

impl CssFont {
    /// Parse `[style] [variant] [weight] {size}px family`. Returns `None`
    /// when no pixel size is present.
    pub fn parse(css: &str) -> Option<Self> {
        let mut font = CssFont::default();
        let mut tokens = css.split_whitespace();
        loop {
            let token = tokens.next()?;
            if let Some(size) = token.strip_suffix("px").and_then(|s| s.parse::<f64>().ok()) {
                font.size = size;
                break;
            }
            match token {
                "italic" => font.style = FontStyle::Italic,
                "oblique" => font.style = FontStyle::Oblique,
                "bold" => font.weight = FontWeight::Name(FontWeightNameSpec::Bold),
                "lighter" => font.weight = FontWeight::Name(FontWeightNameSpec::Lighter),
                "bolder" => font.weight = FontWeight::Name(FontWeightNameSpec::Bolder),
                _ => {
                    if let Ok(n) = token.parse::<f32>() {
                        font.weight = FontWeight::Number(n);
                    }
                }
            }
        }
        let family = tokens.collect::<Vec<_>>().join(" ");
        if !family.is_empty() {
            font.family = family;
        }
        Some(font)
    }

    pub fn spec(&self) -> FontSpec<'_> {
        FontSpec {
            family: Some(&self.family),
            size: Some(self.size),
            style: Some(self.style),
            variant: None,
            weight: Some(self.weight),
        }
    }
}

/// Text measurement front end used by the text mark
#[derive(Clone)]
pub struct TextMetrics {
    measurer: Arc<dyn TextMeasurer>,
}

impl fmt::Debug for TextMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextMetrics").finish_non_exhaustive()
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::estimate()
    }
}

impl TextMetrics {
    pub fn new(measurer: Arc<dyn TextMeasurer>) -> Self {
        Self { measurer }
    }

    /// Widths estimated from the character count
    pub fn estimate() -> Self {
        Self::new(Arc::new(EstimateTextMeasurer::new()))
    }

    /// Widths measured by shaping with system fonts
    #[cfg(feature = "cosmic-text")]
    pub fn exact() -> Self {
        Self::new(Arc::new(crate::measurement::cosmic::CosmicTextMeasurer::new()))
    }

    pub fn width(&self, font: &FontSpec, text: &str) -> f64 {
        let weight = font.weight.unwrap_or_default();
        let style = font.style.unwrap_or_default();
        let config = TextMeasurementConfig {
            text,
            font: font.family(),
            font_size: font.height(),
            font_weight: &weight,
            font_style: &style,
        };
        self.measurer.measure_text_bounds(&config).width
    }

    /// The string actually rendered for `text`, truncated when `limit` is positive
    pub fn text_value(
        &self,
        font: &FontSpec,
        text: &str,
        limit: Option<f64>,
        ellipsis: Option<&str>,
        rtl: bool,
    ) -> String {
        match limit {
            Some(limit) if limit > 0.0 && !text.is_empty() => {
                self.truncate(font, text, limit, ellipsis, rtl)
            }
            _ => text.to_string(),
        }
    }

    /// Longest prefix (or suffix when `rtl`) that fits in `limit` together
    /// with the ellipsis. Text that already fits is returned unchanged.
    pub fn truncate(
        &self,
        font: &FontSpec,
        text: &str,
        limit: f64,
        ellipsis: Option<&str>,
        rtl: bool,
    ) -> String {
        if self.width(font, text) <= limit {
            return text.to_string();
        }

        let ellipsis = ellipsis.filter(|e| !e.is_empty()).unwrap_or(DEFAULT_ELLIPSIS);
        let limit = limit - self.width(font, ellipsis);

        // Byte offset of every char boundary, including the end
        let cuts: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let (mut lo, mut hi) = (0usize, cuts.len() - 1);

        if rtl {
            while lo < hi {
                let mid = (lo + hi) / 2;
                if self.width(font, &text[cuts[mid]..]) > limit {
                    lo = mid + 1;
                } else {
                    hi = mid;
                }
            }
            format!("{ellipsis}{}", &text[cuts[lo]..])
        } else {
            while lo < hi {
                let mid = 1 + (lo + hi) / 2;
                if self.width(font, &text[..cuts[mid]]) <= limit {
                    lo = mid;
                } else {
                    hi = mid - 1;
                }
            }
            format!("{}{ellipsis}", &text[..cuts[lo]])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn font(size: f64) -> FontSpec<'static> {
        FontSpec {
            size: Some(size),
            ..Default::default()
        }
    }

    #[rstest(
        baseline,
        expected,
        case(None, 0.0),
        case(Some(TextBaseline::Alphabetic), 0.0),
        case(Some(TextBaseline::Top), 9.0),
        case(Some(TextBaseline::Middle), 3.0),
        case(Some(TextBaseline::Bottom), -2.0)
    )]
    fn test_baseline_offset(baseline: Option<TextBaseline>, expected: f64) {
        assert_eq!(baseline_offset(baseline, 10.0), expected);
    }

    #[test]
    fn test_default_height() {
        assert_eq!(FontSpec::default().height(), 11.0);
        assert_eq!(font(0.0).height(), 0.0);
    }

    #[test]
    fn test_font_string() {
        assert_eq!(FontSpec::default().to_css(false), "11px sans-serif");
        let spec = FontSpec {
            family: Some("\"Open Sans\", Arial"),
            size: Some(14.0),
            style: Some(FontStyle::Italic),
            variant: Some("small-caps"),
            weight: Some(FontWeight::Name(FontWeightNameSpec::Bold)),
        };
        assert_eq!(
            spec.to_css(false),
            "italic small-caps bold 14px \"Open Sans\", Arial"
        );
        assert_eq!(
            spec.to_css(true),
            "italic small-caps bold 14px 'Open Sans', Arial"
        );
    }

    #[test]
    fn test_truncate_prefix() {
        let metrics = TextMetrics::estimate();
        // Each char is 8px wide at size 10, the ellipsis takes 8px
        let out = metrics.truncate(&font(10.0), "abcdefghij", 40.0, None, false);
        assert_eq!(out, "abcd\u{2026}");
        assert!(metrics.width(&font(10.0), &out) <= 40.0);
    }

    #[test]
    fn test_truncate_suffix_rtl() {
        let metrics = TextMetrics::estimate();
        let out = metrics.truncate(&font(10.0), "abcdefghij", 40.0, Some("..."), true);
        // Three-char ellipsis takes 24px, leaving two chars
        assert_eq!(out, "...ij");
    }

    #[test]
    fn test_truncate_fits() {
        let metrics = TextMetrics::estimate();
        assert_eq!(
            metrics.truncate(&font(10.0), "abc", 100.0, None, false),
            "abc"
        );
        assert_eq!(
            metrics.text_value(&font(10.0), "abcdefghij", None, None, false),
            "abcdefghij"
        );
    }

    #[test]
    fn test_truncate_multibyte() {
        let metrics = TextMetrics::estimate();
        let out = metrics.truncate(&font(10.0), "ééééééé", 24.0, None, false);
        assert_eq!(out, "éé\u{2026}");
    }

    #[test]
    fn test_parse_css_font() {
        let spec = FontSpec {
            family: Some("Helvetica Neue"),
            size: Some(12.0),
            style: Some(FontStyle::Italic),
            variant: Some("small-caps"),
            weight: Some(FontWeight::Number(600.0)),
        };
        let font = CssFont::parse(&spec.to_css(false)).unwrap();
        assert_eq!(font.family, "Helvetica Neue");
        assert_eq!(font.size, 12.0);
        assert_eq!(font.style, FontStyle::Italic);
        assert_eq!(font.weight, FontWeight::Number(600.0));
        assert!(CssFont::parse("bold sans-serif").is_none());
    }
}
