use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The payload does not fit any QR version at the requested EC level.
    #[error("Failed to encode QR code: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    #[error("QR raster does not fit: {modules} modules, border {border}, {module_px} px per module")]
    RasterSize {
        modules: u32,
        border: u32,
        module_px: u32,
    },

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF export failed: {0}")]
    Pdf(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
