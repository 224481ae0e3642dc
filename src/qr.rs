use crate::color::Color;
use crate::contrast::ColorPair;
use crate::error::{Error, Result};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, RgbaImage};
use ndarray::Array2;
use qrcode::{EcLevel, QrCode};
use tracing::debug;

/// Rescale only when the natural raster misses the target by more than this.
const RESCALE_TOLERANCE: f64 = 0.10;

/// Encodes `text` and returns the module grid, `true` for dark modules.
pub fn generate_modules(text: &str, ec_level: EcLevel) -> Result<Array2<bool>> {
    let code = QrCode::with_error_correction_level(text, ec_level)?;

    let width = code.width();
    let modules = code.to_colors();

    let grid = Array2::from_shape_fn((width, width), |(y, x)| {
        matches!(modules[y * width + x], qrcode::Color::Dark)
    });

    debug!(version = ?code.version(), modules = width, "Encoded QR code");
    Ok(grid)
}

/// Pixels per module that best approximate `size` for the given grid.
pub fn module_pixels(modules: usize, border: u32, size: u32) -> u32 {
    let total = modules as f64 + 2.0 * border as f64;
    ((size as f64 / total).round() as u32).max(1)
}

/// Draws the module grid plus a quiet zone of `border` modules.
pub fn rasterize(
    grid: &Array2<bool>,
    border: u32,
    module_px: u32,
    colors: ColorPair,
) -> Result<RgbaImage> {
    let modules = grid.nrows() as u32;
    let side = border
        .checked_mul(2)
        .and_then(|quiet| quiet.checked_add(modules))
        .and_then(|total| total.checked_mul(module_px))
        .ok_or(Error::RasterSize {
            modules,
            border,
            module_px,
        })?;
    let fg = opaque(colors.fg);
    let bg = opaque(colors.bg);

    Ok(ImageBuffer::from_fn(side, side, |x, y| {
        let mx = (x / module_px).checked_sub(border);
        let my = (y / module_px).checked_sub(border);
        match (mx, my) {
            (Some(mx), Some(my)) if mx < modules && my < modules => {
                if grid[[my as usize, mx as usize]] {
                    fg
                } else {
                    bg
                }
            }
            _ => bg,
        }
    }))
}

/// Encodes `text` and renders it close to `size` x `size` pixels.
///
/// The raster keeps its natural size (a whole number of pixels per module)
/// unless that is more than 10% off the target, in which case it is resampled.
pub fn render(
    text: &str,
    ec_level: EcLevel,
    border: u32,
    size: u32,
    colors: ColorPair,
) -> Result<RgbaImage> {
    let grid = generate_modules(text, ec_level)?;
    let module_px = module_pixels(grid.nrows(), border, size);
    let img = rasterize(&grid, border, module_px, colors)?;

    let natural = img.width();
    let deviation = (natural as f64 - size as f64).abs() / size as f64;
    debug!(module_px, natural, target = size, deviation, "Rasterized QR code");

    if deviation > RESCALE_TOLERANCE {
        return Ok(imageops::resize(&img, size, size, FilterType::Lanczos3));
    }
    Ok(img)
}

fn opaque(c: Color) -> Rgba<u8> {
    let [r, g, b] = c.0;
    Rgba([r, g, b, 255])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, WHITE};
    use image::Rgb;

    #[test]
    fn grid_is_square_with_finder_corner() {
        let grid = generate_modules("https://example.com", EcLevel::H).unwrap();
        assert_eq!(grid.nrows(), grid.ncols());
        assert!(grid.nrows() >= 21);
        // Finder pattern: dark outer ring, light separator.
        assert!(grid[[0, 0]]);
        assert!(!grid[[1, 1]]);
        assert!(grid[[2, 2]]);
    }

    #[test]
    fn oversized_payload_fails() {
        let text = "x".repeat(4000);
        assert!(generate_modules(&text, EcLevel::H).is_err());
    }

    #[test]
    fn module_pixels_rounds_and_clamps() {
        assert_eq!(module_pixels(25, 4, 1200), 36); // 1200 / 33 = 36.36
        assert_eq!(module_pixels(25, 4, 1190), 36);
        assert_eq!(module_pixels(25, 4, 1210), 37); // 36.67
        assert_eq!(module_pixels(57, 4, 20), 1);
    }

    #[test]
    fn rasterize_places_quiet_zone_and_modules() {
        let mut grid = Array2::from_elem((3, 3), false);
        grid[[0, 0]] = true;
        grid[[2, 1]] = true;
        let colors = ColorPair {
            fg: Rgb([10, 20, 30]),
            bg: Rgb([200, 210, 220]),
        };

        let img = rasterize(&grid, 1, 2, colors).unwrap();
        assert_eq!(img.dimensions(), (10, 10));

        let fg = Rgba([10, 20, 30, 255]);
        let bg = Rgba([200, 210, 220, 255]);
        assert_eq!(*img.get_pixel(0, 0), bg);
        assert_eq!(*img.get_pixel(2, 2), fg);
        assert_eq!(*img.get_pixel(3, 3), fg);
        assert_eq!(*img.get_pixel(4, 2), bg);
        // grid[[2, 1]] -> module (x=1, y=2) -> pixels x 4..6, y 6..8
        assert_eq!(*img.get_pixel(4, 6), fg);
        assert_eq!(*img.get_pixel(9, 9), bg);
    }

    #[test]
    fn keeps_natural_size_within_tolerance() {
        let colors = ColorPair { fg: BLACK, bg: WHITE };
        let img = render("hello", EcLevel::H, 4, 1200, colors).unwrap();
        let deviation = (img.width() as f64 - 1200.0).abs() / 1200.0;
        assert!(deviation <= RESCALE_TOLERANCE);
        assert_eq!(img.width(), img.height());
        assert_eq!(img.width() % (21 + 8), 0);
    }

    #[test]
    fn rescales_when_far_from_target() {
        // A version 1 code with border 4 needs 29 px at 1 px per module.
        let colors = ColorPair { fg: BLACK, bg: WHITE };
        let img = render("hello", EcLevel::L, 4, 40, colors).unwrap();
        assert_eq!(img.dimensions(), (40, 40));
    }

    #[test]
    fn overflowing_border_is_an_error() {
        let colors = ColorPair { fg: BLACK, bg: WHITE };
        let result = render("hi", EcLevel::L, 3_000_000_000, 100, colors);
        assert!(matches!(result, Err(Error::RasterSize { border: 3_000_000_000, .. })));

        let grid = Array2::from_elem((21, 21), false);
        assert!(rasterize(&grid, 4, u32::MAX, colors).is_err());
    }
}
