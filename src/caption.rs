use crate::color::Color;
use crate::font::CaptionFont;
use image::imageops;
use image::{Pixel, Rgba, RgbaImage};
use tracing::debug;

const STRIP_RATIO: f32 = 0.18;
const TEXT_RATIO: f32 = 0.38;
const RULE_START: f32 = 0.12;
const RULE_END: f32 = 0.88;
const RULE_WIDTH: u32 = 2;
const RULE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 40]);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionStyle {
    pub strip_bg: Color,
    pub text_color: Color,
}

/// Returns `base` extended by a strip below it with `caption` centered in it.
pub fn add_caption_strip(
    base: &RgbaImage,
    caption: &str,
    font: &CaptionFont,
    style: CaptionStyle,
) -> RgbaImage {
    let (w, h) = base.dimensions();
    let strip_h = strip_height(h);

    let [r, g, b] = style.strip_bg.0;
    let mut canvas = RgbaImage::from_pixel(w, h + strip_h, Rgba([r, g, b, 255]));
    imageops::replace(&mut canvas, base, 0, 0);

    draw_rule(&mut canvas, w, h);

    let px = (strip_h as f32 * TEXT_RATIO).max(1.0);
    let (tw, th) = font.measure(caption, px);
    let tx = (w as i32 - tw as i32) / 2;
    let ty = h as i32 + (strip_h as i32 - th as i32) / 2;
    debug!(strip_h, px, tw, th, tx, ty, "Drawing caption");

    let [r, g, b] = style.text_color.0;
    font.draw(&mut canvas, Rgba([r, g, b, 255]), tx, ty, px, caption);
    canvas
}

pub fn strip_height(base_height: u32) -> u32 {
    (base_height as f32 * STRIP_RATIO) as u32
}

/// Faint separator along the top edge of the strip.
fn draw_rule(canvas: &mut RgbaImage, w: u32, top: u32) {
    let start = (w as f32 * RULE_START) as u32;
    let end = (w as f32 * RULE_END) as u32;
    let bottom = (top + RULE_WIDTH).min(canvas.height());
    for y in top..bottom {
        for x in start..=end.min(w.saturating_sub(1)) {
            canvas.get_pixel_mut(x, y).blend(&RULE_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn style() -> CaptionStyle {
        CaptionStyle {
            strip_bg: Rgb([250, 240, 230]),
            text_color: Rgb([10, 20, 200]),
        }
    }

    #[test]
    fn strip_is_appended_below() {
        let base = RgbaImage::from_pixel(200, 200, Rgba([0, 0, 0, 255]));
        let out = add_caption_strip(&base, "Hi", &CaptionFont::Bitmap, style());
        assert_eq!(out.dimensions(), (200, 236));
        assert_eq!(*out.get_pixel(5, 100), Rgba([0, 0, 0, 255]));
        assert_eq!(*out.get_pixel(5, 230), Rgba([250, 240, 230, 255]));
    }

    #[test]
    fn caption_is_drawn_in_text_color_inside_strip() {
        let base = RgbaImage::from_pixel(400, 400, Rgba([255, 255, 255, 255]));
        let out = add_caption_strip(&base, "HELLO", &CaptionFont::Bitmap, style());
        let text = Rgba([10, 20, 200, 255]);

        let mut hits = 0;
        for (x, y, p) in out.enumerate_pixels() {
            if *p == text {
                assert!(y >= 400, "text leaked into the QR area at ({x}, {y})");
                hits += 1;
            }
        }
        assert!(hits > 0);
    }

    #[test]
    fn separator_rule_darkens_the_strip_top() {
        let base = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let out = add_caption_strip(&base, "", &CaptionFont::Bitmap, style());
        let rule = out.get_pixel(50, 100);
        assert!(rule[0] < 250 && rule[0] > 200);
        // Outside the 12%..88% span the strip is untouched.
        assert_eq!(*out.get_pixel(5, 100), Rgba([250, 240, 230, 255]));
    }

    #[test]
    fn strip_height_is_eighteen_percent() {
        assert_eq!(strip_height(1200), 216);
        assert_eq!(strip_height(1), 0);
    }
}
