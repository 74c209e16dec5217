use avenger_common::canvas::CanvasDimensions;
use avenger_geometry::Bounds;
use avenger_image::ResourceLoader;
use avenger_scenegraph::renderer::{apply_images, RendererBase};
use avenger_scenegraph::surface::SurfacePaint;
use avenger_scenegraph::{ItemId, Scene};

use crate::config::CanvasConfig;
use crate::error::AvengerCanvasError;
use crate::surface::CanvasSurface;

/// Immediate-mode renderer that repaints only the regions marked dirty
/// since the previous pass.
pub struct CanvasRenderer<S: CanvasSurface> {
    base: RendererBase,
    surface: S,
    config: CanvasConfig,
    redraw: bool,
    dirty: Bounds,
}

impl<S: CanvasSurface> CanvasRenderer<S> {
    pub fn new(surface: S, config: CanvasConfig) -> Self {
        Self::with_loader(surface, config, ResourceLoader::new())
    }

    pub fn with_loader(surface: S, config: CanvasConfig, loader: ResourceLoader) -> Self {
        let dims = surface.dimensions();
        let mut base = RendererBase::new(loader);
        base.resize(dims.width(), dims.height(), dims.origin);
        base.set_background(config.background.clone());
        Self {
            base,
            surface,
            config,
            redraw: true,
            dirty: Bounds::new(),
        }
    }

    /// Resize the surface. The next render repaints everything.
    pub fn resize(&mut self, width: f64, height: f64, origin: [f64; 2]) -> Result<(), AvengerCanvasError> {
        let dimensions = CanvasDimensions {
            size: [width, height],
            scale: self.config.pixel_ratio,
            origin,
        };
        self.surface.resize(dimensions)?;
        self.base.resize(width, height, origin);
        self.redraw = true;
        Ok(())
    }

    pub fn background(&self) -> Option<&str> {
        self.base.background()
    }

    pub fn set_background(&mut self, background: Option<String>) {
        self.config.background = background.clone();
        self.base.set_background(background);
        self.redraw = true;
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn loader(&self) -> &ResourceLoader {
        self.base.loader()
    }

    /// Add the current bounds of `item`, in canvas coordinates, to the
    /// region repainted by the next render
    pub fn dirty(&mut self, scene: &Scene, item: ItemId) {
        let Some(it) = scene.try_item(item) else {
            return;
        };
        let mut b = it.bounds;
        if b.empty() {
            return;
        }
        let (x, y) = scene.group_offset(item);
        b.translate(x, y);
        self.dirty.union(&b);
    }

    /// Force the next render to repaint the whole surface
    pub fn redraw_all(&mut self) {
        self.redraw = true;
    }

    /// Region repainted by the next render, empty after a render
    pub fn dirty_bounds(&self) -> Bounds {
        self.dirty
    }

    #[tracing::instrument(skip_all)]
    pub fn render(&mut self, scene: &Scene) {
        let [ox, oy] = self.base.origin();
        let (w, h) = (self.base.width(), self.base.height());
        let mut view = Bounds::from_coords(0.0, 0.0, w, h);
        view.translate(-ox, -oy);

        self.surface.save();
        let region = if self.redraw || self.dirty.empty() {
            self.redraw = false;
            *view.expand(1.0)
        } else {
            self.clip_to(*view.intersect(&self.dirty))
        };
        tracing::trace!("render region {:?}", region);
        self.clear(-ox, -oy, w, h);
        scene.draw(&mut self.surface, Some(&region));
        self.surface.restore();
        self.dirty.clear();
    }

    /// Render, wait for any images the scene references, then render again
    /// if images arrived.
    pub async fn render_async(&mut self, scene: &mut Scene) -> Result<(), AvengerCanvasError> {
        self.render(scene);
        let images = self.base.load_images(scene).await;
        if apply_images(scene, images)? {
            self.redraw = true;
            self.render(scene);
        }
        Ok(())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn clip_to(&mut self, mut b: Bounds) -> Bounds {
        b.expand(1.0).round();
        let ratio = self.config.pixel_ratio;
        if ratio % 1.0 != 0.0 {
            b.scale(ratio).round().scale(1.0 / ratio);
        }
        let [ox, oy] = self.base.origin();
        b.translate(-(ox % 1.0), -(oy % 1.0));
        self.surface.begin_path();
        self.surface.rect(b.x1, b.y1, b.width(), b.height());
        self.surface.clip();
        b
    }

    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.surface.clear_rect(x, y, w, h);
        if let Some(background) = self.base.background() {
            self.surface.set_global_alpha(1.0);
            self.surface
                .set_fill_style(SurfacePaint::Color(background.to_string()));
            self.surface.fill_rect(x, y, w, h);
        }
    }
}
