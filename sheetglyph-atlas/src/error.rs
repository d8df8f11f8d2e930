//! Atlas error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("raster is {width}x{height} but has {len} bytes of RGBA data")]
    RasterSize { width: u32, height: u32, len: usize },
}
