use thiserror::Error;

use avenger_scenegraph::error::AvengerSceneGraphError;

#[derive(Error, Debug)]
pub enum AvengerCanvasError {
    #[error("Invalid canvas dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("PNG encoding error: {0}")]
    PngEncodingError(String),

    #[error("Scene graph error: {0}")]
    SceneGraphError(#[from] AvengerSceneGraphError),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}
