//! State and image loading shared by the canvas and SVG renderers.

use std::future::Future;

use avenger_image::{ImageHandle, ResourceLoader};
use futures::future::join_all;

use crate::error::AvengerSceneGraphError;
use crate::marks::{image::needs_load, MarkType};
use crate::scene::{ItemId, Scene};

/// Output size, origin offset, background and resource loader of a renderer
#[derive(Clone)]
pub struct RendererBase {
    loader: ResourceLoader,
    width: f64,
    height: f64,
    origin: [f64; 2],
    background: Option<String>,
}

impl Default for RendererBase {
    fn default() -> Self {
        Self::new(ResourceLoader::new())
    }
}

impl RendererBase {
    pub fn new(loader: ResourceLoader) -> Self {
        Self {
            loader,
            width: 0.0,
            height: 0.0,
            origin: [0.0, 0.0],
            background: None,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64, origin: [f64; 2]) {
        self.width = width;
        self.height = height;
        self.origin = origin;
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn set_background(&mut self, background: Option<String>) {
        self.background = background;
    }

    pub fn loader(&self) -> &ResourceLoader {
        &self.loader
    }

    /// Image items whose `url` has not been loaded yet
    pub fn pending_images(&self, scene: &Scene) -> Vec<(ItemId, String)> {
        scene
            .marks()
            .into_iter()
            .filter(|m| scene.mark(*m).marktype == MarkType::Image)
            .flat_map(|m| scene.mark(m).items.clone())
            .filter_map(|id| {
                let item = scene.item(id);
                if needs_load(item) {
                    item.props.url.clone().map(|url| (id, url))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Start loading every pending image of `scene`. The loads count as
    /// pending requests of the loader until the returned future completes.
    pub fn load_images(&self, scene: &Scene) -> impl Future<Output = Vec<(ItemId, ImageHandle)>> + 'static {
        let loads: Vec<_> = self
            .pending_images(scene)
            .into_iter()
            .map(|(id, url)| {
                let load = self.loader.load_image(&url);
                async move { (id, load.await) }
            })
            .collect();
        if !loads.is_empty() {
            tracing::debug!("loading {} images", loads.len());
        }
        join_all(loads)
    }
}

/// Store loaded images on their items and recompute bounds. Returns whether
/// any item changed.
pub fn apply_images(
    scene: &mut Scene,
    images: Vec<(ItemId, ImageHandle)>,
) -> Result<bool, AvengerSceneGraphError> {
    let mut changed = false;
    for (id, image) in images {
        if scene.is_live_item(id) {
            scene.set_image(id, image)?;
            changed = true;
        }
    }
    if changed {
        scene.bound_all();
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::ItemProps;
    use crate::scene::MarkDef;
    use futures::executor::block_on;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_data_url() -> String {
        use base64::prelude::{Engine, BASE64_STANDARD};
        let img = image::RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        format!("data:image/png;base64,{}", BASE64_STANDARD.encode(bytes))
    }

    #[test]
    fn test_images_load_and_rebound() {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let mark = scene.add_mark(root, MarkDef::new(MarkType::Image)).unwrap();
        let item = scene
            .add_item(
                mark,
                ItemProps {
                    url: Some(png_data_url()),
                    ..Default::default()
                },
            )
            .unwrap();
        scene.bound_all();
        assert_eq!(scene.item(item).bounds.width(), 0.0);

        let base = RendererBase::default();
        assert_eq!(base.pending_images(&scene).len(), 1);
        let loaded = block_on(base.load_images(&scene));
        assert!(apply_images(&mut scene, loaded).unwrap());
        assert_eq!(scene.item(item).bounds.width(), 4.0);
        assert_eq!(scene.item(item).bounds.height(), 2.0);
        assert!(base.pending_images(&scene).is_empty());
        assert_eq!(base.loader().pending(), 0);
    }

    #[test]
    fn test_failed_load_is_unloaded_placeholder() {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let mark = scene.add_mark(root, MarkDef::new(MarkType::Image)).unwrap();
        let item = scene
            .add_item(
                mark,
                ItemProps {
                    url: Some("data:image/png;base64,@@@".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        let base = RendererBase::default();
        let loaded = block_on(base.load_images(&scene));
        apply_images(&mut scene, loaded).unwrap();
        let image = scene.item(item).image.clone().unwrap_or_default();
        assert!(!image.is_loaded());
        assert_eq!(scene.item(item).bounds.width(), 0.0);
    }
}
