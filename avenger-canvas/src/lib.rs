pub mod config;
pub mod error;
pub mod pixmap;
pub mod renderer;
pub mod surface;

pub use config::CanvasConfig;
pub use error::AvengerCanvasError;
pub use pixmap::PixmapSurface;
pub use renderer::CanvasRenderer;
pub use surface::CanvasSurface;
