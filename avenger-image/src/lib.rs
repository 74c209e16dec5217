pub mod error;
pub mod fetcher;
pub mod loader;
pub mod store;

#[cfg(feature = "image-request")]
pub mod reqwest_fetcher;

#[cfg(feature = "svg")]
pub mod svg;

use std::sync::Arc;

use base64::{prelude::BASE64_STANDARD, Engine};
use error::AvengerImageError;
use serde::{Deserialize, Serialize};

pub use fetcher::{make_image_fetcher, ImageFetcher};
pub use loader::{ResourceLoader, SanitizedUrl};
pub use store::ImageStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaImage {
    pub fn to_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn from_image(img: &image::RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.to_vec(),
        }
    }

    /// Decode raster or SVG bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AvengerImageError> {
        if looks_like_svg(bytes) {
            let svg_str = String::from_utf8(bytes.to_vec())?;
            return Self::from_svg(&svg_str);
        }
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&img.into_rgba8()))
    }

    /// Decode an inline `data:` url
    pub fn from_data_url(s: &str) -> Result<Self, AvengerImageError> {
        if let Some(data) = s.strip_prefix("data:image/svg+xml;base64,") {
            let decoded = BASE64_STANDARD.decode(data)?;
            Self::from_svg(&String::from_utf8(decoded)?)
        } else if let Some(data) = s.strip_prefix("data:image/svg+xml,") {
            let svg_str = urlencoding::decode(data)?;
            Self::from_svg(svg_str.as_ref())
        } else if let Some((_, data)) = s
            .strip_prefix("data:image/")
            .and_then(|rest| rest.split_once(";base64,"))
        {
            let decoded = BASE64_STANDARD.decode(data)?;
            let img = image::load_from_memory(&decoded)?;
            Ok(Self::from_image(&img.into_rgba8()))
        } else {
            Err(AvengerImageError::InvalidDataUrl(
                s.chars().take(32).collect(),
            ))
        }
    }

    #[allow(unused_variables)]
    fn from_svg(svg_str: &str) -> Result<Self, AvengerImageError> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "svg")] {
                let png_data = svg::svg_to_png(svg_str, 1.0)?;
                let img = image::load_from_memory(&png_data)?;
                Ok(Self::from_image(&img.into_rgba8()))
            } else {
                Err(AvengerImageError::SvgSupportDisabled("SVG support not enabled".to_string()))
            }
        }
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// Result of an image request. Failed loads produce an unloaded handle that
/// measures 0x0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageHandle {
    pub url: Option<String>,
    pub image: Option<Arc<RgbaImage>>,
}

impl ImageHandle {
    pub fn loaded(url: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            url: Some(url.into()),
            image: Some(Arc::new(image)),
        }
    }

    pub fn unloaded(url: Option<String>) -> Self {
        Self { url, image: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn width(&self) -> f64 {
        self.image.as_ref().map(|img| img.width as f64).unwrap_or(0.0)
    }

    pub fn height(&self) -> f64 {
        self.image.as_ref().map(|img| img.height as f64).unwrap_or(0.0)
    }
}


#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;

    #[test]
    fn test_png_data_url() {
        let img = RgbaImage::from_data_url(&red_png_data_url()).unwrap();
        assert_eq!((img.width, img.height), (2, 3));
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_bad_data_url() {
        assert!(RgbaImage::from_data_url("data:text/plain,hello").is_err());
        assert!(RgbaImage::from_data_url("data:image/png;base64,!!!").is_err());
    }

    #[cfg(feature = "svg")]
    #[test]
    fn test_svg_data_url() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="5"><rect width="4" height="5" fill="blue"/></svg>"#;
        let url = format!("data:image/svg+xml,{}", urlencoding::encode(svg));
        let img = RgbaImage::from_data_url(&url).unwrap();
        assert_eq!((img.width, img.height), (4, 5));
    }

    #[test]
    fn test_unloaded_handle_is_zero_sized() {
        let handle = ImageHandle::unloaded(Some("missing.png".to_string()));
        assert!(!handle.is_loaded());
        assert_eq!(handle.width(), 0.0);
        assert_eq!(handle.height(), 0.0);
    }
}
