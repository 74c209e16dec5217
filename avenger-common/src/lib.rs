pub mod canvas;
pub mod format;
pub mod types;
