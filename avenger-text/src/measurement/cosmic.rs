use cosmic_text::{fontdb::Database, Attrs, Buffer, Family, FontSystem, Metrics, SwashCache};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use super::{TextBounds, TextMeasurementConfig, TextMeasurer};
use crate::error::AvengerTextError;
use crate::types::{FontStyle, FontWeight};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref FONT_SYSTEM: Mutex<FontSystem> = Mutex::new(build_font_system());
    pub static ref SWASH_CACHE: Mutex<SwashCache> = Mutex::new(SwashCache::new());
}

fn build_font_system() -> FontSystem {
    let mut font_system = FontSystem::new();

    // Override default families based on what system fonts are available
    let fontdb = font_system.db_mut();
    setup_default_fonts(fontdb);
    font_system
}

fn setup_default_fonts(fontdb: &mut Database) {
    let families: HashSet<String> = fontdb
        .faces()
        .flat_map(|face| {
            face.families
                .iter()
                .map(|(fam, _lang)| fam.clone())
                .collect::<Vec<_>>()
        })
        .collect();

    for family in ["Helvetica", "Arial", "Liberation Sans", "DejaVu Sans"] {
        if families.contains(family) {
            fontdb.set_sans_serif_family(family);
            break;
        }
    }

    for family in [
        "Courier New",
        "Courier",
        "Liberation Mono",
        "DejaVu Sans Mono",
    ] {
        if families.contains(family) {
            fontdb.set_monospace_family(family);
            break;
        }
    }

    for family in [
        "Times New Roman",
        "Times",
        "Liberation Serif",
        "DejaVu Serif",
    ] {
        if families.contains(family) {
            fontdb.set_serif_family(family);
            break;
        }
    }
}

/// Exact measurer that shapes text with the system fonts
#[derive(Debug, Clone, Copy, Default)]
pub struct CosmicTextMeasurer;

impl CosmicTextMeasurer {
    pub fn new() -> Self {
        Self
    }
}

impl TextMeasurer for CosmicTextMeasurer {
    fn measure_text_bounds(&self, config: &TextMeasurementConfig) -> TextBounds {
        let mut font_system = FONT_SYSTEM.lock().unwrap_or_else(PoisonError::into_inner);
        let buffer = make_cosmic_text_buffer(config, &mut font_system);
        measure_text_buffer(&buffer, config.font_size)
    }
}

pub fn measure_text_buffer(buffer: &Buffer, font_size: f64) -> TextBounds {
    let runs = buffer.layout_runs().collect::<Vec<_>>();

    if runs.is_empty() {
        return TextBounds::empty(font_size);
    }

    let mut max_ascent = 0.0f32;
    let mut max_descent = 0.0f32;
    let mut max_line_height = 0.0f32;
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;

    for run in &runs {
        let ascent = run.line_y - run.line_top;
        let descent = run.line_height - ascent;

        max_ascent = max_ascent.max(ascent);
        max_descent = max_descent.max(descent);
        max_line_height = max_line_height.max(run.line_height);

        for glyph in run.glyphs {
            min_x = min_x.min(glyph.x);
            max_x = max_x.max(glyph.x + glyph.w);
        }
    }

    let width = if min_x == f32::MAX {
        0.0
    } else {
        (max_x - min_x) as f64
    };

    TextBounds {
        width,
        height: (max_ascent + max_descent) as f64,
        ascent: max_ascent as f64,
        descent: max_descent as f64,
        line_height: max_line_height as f64,
    }
}

/// Map the first entry of a CSS font-family list to a cosmic-text family
fn css_family(font: &str) -> Family<'_> {
    let first = font
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    match first.to_lowercase().as_str() {
        "serif" => Family::Serif,
        "" | "sans serif" | "sans-serif" => Family::SansSerif,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        "monospace" => Family::Monospace,
        _ => Family::Name(first),
    }
}

pub fn make_cosmic_text_buffer(
    config: &TextMeasurementConfig,
    font_system: &mut FontSystem,
) -> Buffer {
    let mut attrs = Attrs::new();
    attrs.family = css_family(config.font);
    attrs.weight = cosmic_text::Weight(weight_number(config.font_weight));
    attrs.style = match config.font_style {
        FontStyle::Normal => cosmic_text::Style::Normal,
        FontStyle::Italic => cosmic_text::Style::Italic,
        FontStyle::Oblique => cosmic_text::Style::Oblique,
    };

    let size = config.font_size as f32;
    let metrics = Metrics::new(size, size);
    let mut buffer = Buffer::new(font_system, metrics);

    buffer.set_text(
        font_system,
        config.text,
        attrs,
        cosmic_text::Shaping::Advanced,
    );
    // Unbounded width keeps the text on a single line
    buffer.set_size(font_system, None, None);
    buffer.shape_until_scroll(font_system, false);

    buffer
}

fn weight_number(weight: &FontWeight) -> u16 {
    weight.to_number().clamp(1.0, 1000.0) as u16
}

/// Load every font file under `dir` into the shared font system
pub fn register_font_directory<P: AsRef<Path>>(dir: P) -> Result<(), AvengerTextError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(AvengerTextError::FontLoadError(dir.display().to_string()));
    }
    let mut font_system = FONT_SYSTEM.lock().unwrap_or_else(PoisonError::into_inner);
    let fontdb = font_system.db_mut();
    fontdb.load_fonts_dir(dir);
    setup_default_fonts(fontdb);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FontStyle, FontWeight};

    #[test]
    fn test_css_family() {
        assert_eq!(css_family("\"Helvetica Neue\", Arial"), Family::Name("Helvetica Neue"));
        assert_eq!(css_family("sans-serif"), Family::SansSerif);
        assert_eq!(css_family("Monospace"), Family::Monospace);
    }

    #[test]
    fn test_cosmic_text_measurer() {
        let has_fonts = FONT_SYSTEM
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .db()
            .faces()
            .next()
            .is_some();

        let config = TextMeasurementConfig {
            text: "Hello, World!",
            font: "serif",
            font_size: 16.0,
            font_weight: &FontWeight::default(),
            font_style: &FontStyle::Normal,
        };
        let bounds = CosmicTextMeasurer::new().measure_text_bounds(&config);

        assert!(bounds.width >= 0.0);
        if has_fonts {
            assert!(bounds.width > 0.0);
            assert!(bounds.line_height > 0.0);
        }
    }

    #[test]
    fn test_register_missing_directory() {
        assert!(register_font_directory("/definitely/not/a/font/dir").is_err());
    }
}
