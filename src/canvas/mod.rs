pub mod capture;
pub mod cursor;
pub mod document;
pub mod export;
pub mod input;
pub mod invalidate;
pub mod model;
pub mod raster;
pub mod render;
pub mod service;
pub mod store;
pub mod surface;

pub use service::PaintCanvas;
