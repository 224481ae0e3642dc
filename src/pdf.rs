use crate::error::{Error, Result};
use image::buffer::ConvertBuffer;
use image::{DynamicImage, RgbImage, RgbaImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

/// `output.png` -> `output.pdf`, next to the PNG.
pub fn pdf_path(png: &Path) -> PathBuf {
    png.with_extension("pdf")
}

/// Writes `img` as a single-page PDF sized to print it at 300 DPI.
pub fn write_pdf(img: &RgbaImage, path: &Path) -> Result<()> {
    let (w, h) = img.dimensions();
    let page_w = Mm(w as f32 * MM_PER_INCH / DPI);
    let page_h = Mm(h as f32 * MM_PER_INCH / DPI);

    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "QR code".to_string());

    let (doc, page, layer) = PdfDocument::new(title.as_str(), page_w, page_h, "QR");
    let layer = doc.get_page(page).get_layer(layer);

    // Alpha is dropped, PDF images are embedded as plain RGB.
    let rgb: RgbImage = img.convert();
    Image::from_dynamic_image(&DynamicImage::ImageRgb8(rgb)).add_to_layer(
        layer,
        ImageTransform {
            dpi: Some(DPI),
            ..Default::default()
        },
    );

    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(|e| Error::Pdf(e.to_string()))?;

    debug!(path = %path.display(), width_mm = page_w.0, height_mm = page_h.0, "Wrote PDF");
    Ok(())
}
