use serde::{Deserialize, Serialize};

/// Logical size, device pixel ratio and origin offset of a rendering surface
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDimensions {
    pub size: [f64; 2],
    pub scale: f64,
    pub origin: [f64; 2],
}

impl Default for CanvasDimensions {
    fn default() -> Self {
        Self {
            size: [0.0, 0.0],
            scale: 1.0,
            origin: [0.0, 0.0],
        }
    }
}

impl CanvasDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: [width, height],
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: [f64; 2]) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn width(&self) -> f64 {
        self.size[0]
    }

    pub fn height(&self) -> f64 {
        self.size[1]
    }

    pub fn to_physical_width(&self) -> u32 {
        (self.size[0] * self.scale).max(0.0) as u32
    }

    pub fn to_physical_height(&self) -> u32 {
        (self.size[1] * self.scale).max(0.0) as u32
    }
}
