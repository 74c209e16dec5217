use lazy_static::lazy_static;
use resvg::render;
use std::panic;
use std::sync::{Arc, Mutex, PoisonError};
use usvg::fontdb::Database;

use crate::error::AvengerImageError;

lazy_static! {
    pub static ref FONT_DB: Mutex<Arc<Database>> = Mutex::new(Arc::new(init_font_db()));
}

fn init_font_db() -> Database {
    let mut font_database = Database::new();
    font_database.load_system_fonts();
    font_database
}

/// Rasterize an SVG document to PNG bytes
pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, AvengerImageError> {
    let fontdb = FONT_DB.lock().unwrap_or_else(PoisonError::into_inner).clone();

    // usvg and resvg may panic on pathological input
    let response = panic::catch_unwind(panic::AssertUnwindSafe(move || -> Result<Vec<u8>, AvengerImageError> {
        let xml_opt = usvg::roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let opts = usvg::Options {
            fontdb,
            ..Default::default()
        };
        let doc = usvg::roxmltree::Document::parse_with_options(svg, xml_opt)?;
        let rtree = usvg::Tree::from_xmltree(&doc, &opts)?;

        let width = ((rtree.size().width() * scale) as u32).max(1);
        let height = ((rtree.size().height() * scale) as u32).max(1);
        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            AvengerImageError::InternalError(format!("cannot allocate {width}x{height} pixmap"))
        })?;

        let transform = tiny_skia::Transform::from_scale(scale, scale);
        render(&rtree, transform, &mut pixmap.as_mut());
        pixmap
            .encode_png()
            .map_err(|err| AvengerImageError::InternalError(err.to_string()))
    }));

    response.unwrap_or_else(|_| {
        Err(AvengerImageError::InternalError(
            "svg rasterization panicked".to_string(),
        ))
    })
}
