use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::path::PathBuf;
use tracing::debug;

const BITMAP_GLYPH: u32 = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// A TrueType/OpenType file or collection (first face is used).
    File(PathBuf),
    /// Installed fonts matching any of these family names, first match wins.
    System(Vec<String>),
}

/// File paths and system families tried when no font is given explicitly.
pub fn default_sources() -> Vec<FontSource> {
    vec![
        FontSource::File("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".into()),
        FontSource::File("/System/Library/Fonts/Supplemental/Avenir.ttc".into()),
        FontSource::File("/System/Library/Fonts/Supplemental/Helvetica.ttc".into()),
        FontSource::System(
            ["DejaVu Sans", "Liberation Sans", "Noto Sans", "Helvetica", "Arial"]
                .into_iter()
                .map(String::from)
                .collect(),
        ),
    ]
}

/// Caption font, falling back to a built-in 8x8 bitmap when no outline font loads.
pub enum CaptionFont {
    Outline(Font<'static>),
    Bitmap,
}

impl CaptionFont {
    /// Returns the first source that loads, or the bitmap font.
    pub fn load(sources: &[FontSource]) -> Self {
        for source in sources {
            if let Some(font) = try_load(source) {
                debug!(?source, "Loaded caption font");
                return CaptionFont::Outline(font);
            }
            debug!(?source, "Caption font unavailable");
        }
        debug!("Falling back to built-in bitmap font");
        CaptionFont::Bitmap
    }

    /// Width and height in pixels of `text` drawn at `px` pixels high.
    pub fn measure(&self, text: &str, px: f32) -> (u32, u32) {
        match self {
            CaptionFont::Outline(font) => {
                let (w, h) = text_size(Scale::uniform(px), font, text);
                (w.max(0) as u32, h.max(0) as u32)
            }
            CaptionFont::Bitmap => {
                let cell = bitmap_scale(px) * BITMAP_GLYPH;
                (cell * text.chars().count() as u32, cell)
            }
        }
    }

    /// Draws `text` with its top-left corner at (`x`, `y`).
    pub fn draw(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, px: f32, text: &str) {
        match self {
            CaptionFont::Outline(font) => {
                draw_text_mut(canvas, color, x, y, Scale::uniform(px), font, text);
            }
            CaptionFont::Bitmap => draw_bitmap_text(canvas, color, x, y, bitmap_scale(px), text),
        }
    }
}

fn try_load(source: &FontSource) -> Option<Font<'static>> {
    match source {
        FontSource::File(path) => {
            let data = std::fs::read(path).ok()?;
            Font::try_from_vec_and_index(data, 0)
        }
        FontSource::System(names) => {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();

            let families: Vec<fontdb::Family> =
                names.iter().map(|n| fontdb::Family::Name(n.as_str())).collect();
            let id = db.query(&fontdb::Query {
                families: &families,
                ..Default::default()
            })?;

            db.with_face_data(id, |data, index| {
                Font::try_from_vec_and_index(data.to_vec(), index)
            })
            .flatten()
        }
    }
}

fn bitmap_scale(px: f32) -> u32 {
    ((px / BITMAP_GLYPH as f32).round() as u32).max(1)
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_text(canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, scale: u32, text: &str) {
    let step = (BITMAP_GLYPH * scale) as i32;
    for (i, c) in text.chars().enumerate() {
        let gx = x + i as i32 * step;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..BITMAP_GLYPH {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let rect = Rect::at(gx + (col * scale) as i32, y + row as i32 * scale as i32)
                    .of_size(scale, scale);
                draw_filled_rect_mut(canvas, rect, color);
            }
        }
    }
}
