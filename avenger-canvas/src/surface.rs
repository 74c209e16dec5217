use avenger_common::canvas::CanvasDimensions;
use avenger_scenegraph::surface::DrawingSurface;

use crate::error::AvengerCanvasError;

/// A drawing surface the canvas renderer can size. After `resize` the
/// surface maps scene units to pixels with the dimensions' scale and origin.
pub trait CanvasSurface: DrawingSurface {
    fn resize(&mut self, dimensions: CanvasDimensions) -> Result<(), AvengerCanvasError>;
    fn dimensions(&self) -> CanvasDimensions;
}
