use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

const PAD_RATIO: f32 = 0.08;
const PLATE: Rgba<u8> = Rgba([255, 255, 255, 230]);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoStyle {
    /// Maximum logo width as a fraction of the QR width.
    pub scale: f32,
    /// Corner radius as a fraction of the shorter logo side.
    pub round: f32,
}

impl Default for LogoStyle {
    fn default() -> Self {
        Self {
            scale: 0.20,
            round: 0.25,
        }
    }
}

/// Pastes `logo` centered on `base`, on a rounded translucent white plate.
pub fn add_logo(base: &mut RgbaImage, logo: &DynamicImage, style: LogoStyle) {
    let target_w = ((base.width() as f32 * style.scale) as u32).max(1);
    let mut logo = fit_width(logo.to_rgba8(), target_w);
    let (w, h) = logo.dimensions();

    let radius = (w.min(h) as f32 * style.round) as u32;
    if radius > 0 {
        round_corners(&mut logo, radius);
    }

    let pad = (w.min(h) as f32 * PAD_RATIO) as u32;
    let plate = rounded_plate(w + 2 * pad, h + 2 * pad, radius + pad / 2);

    let x = (base.width() as i64 - plate.width() as i64) / 2;
    let y = (base.height() as i64 - plate.height() as i64) / 2;
    debug!(w, h, radius, pad, x, y, "Placing logo");

    imageops::overlay(base, &plate, x, y);
    imageops::overlay(base, &logo, x + pad as i64, y + pad as i64);
}

/// Shrinks `logo` to `target_w` keeping its aspect ratio. Never upscales.
pub fn fit_width(logo: RgbaImage, target_w: u32) -> RgbaImage {
    let (w, h) = logo.dimensions();
    if w <= target_w {
        return logo;
    }
    let new_h = ((target_w as f64 * h as f64 / w as f64) as u32).max(1);
    imageops::resize(&logo, target_w, new_h, FilterType::Lanczos3)
}

/// Clears alpha outside a rounded rectangle covering the whole image.
pub fn round_corners(img: &mut RgbaImage, radius: u32) {
    let (w, h) = img.dimensions();
    for (x, y, px) in img.enumerate_pixels_mut() {
        if !in_rounded_rect(x, y, w, h, radius) {
            px[3] = 0;
        }
    }
}

fn rounded_plate(w: u32, h: u32, radius: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        if in_rounded_rect(x, y, w, h, radius) {
            PLATE
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn in_rounded_rect(x: u32, y: u32, w: u32, h: u32, radius: u32) -> bool {
    let r = radius.min(w / 2).min(h / 2) as f32;
    let px = x as f32 + 0.5;
    let py = y as f32 + 0.5;
    let dx = px - px.clamp(r, w as f32 - r);
    let dy = py - py.clamp(r, h as f32 - r);
    dx * dx + dy * dy <= r * r
}
