use crate::color::{brightness, Color};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbaImage};
use kmeans_colors::get_kmeans;
use palette::Srgb;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_COUNT: usize = 5;

const SAMPLE_SIZE: u32 = 150;
const NEAR_WHITE: f32 = 240.0;
const MIN_ALPHA: u8 = 16;

const KMEANS_MAX_ITER: usize = 20;
const KMEANS_CONVERGE: f32 = 1e-4;
const KMEANS_SEED: u64 = 0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteEntry {
    pub color: Color,
    pub count: u32,
}

/// Returns up to `count` dominant colors of `img`, most frequent first.
///
/// The palette is over-requested (`2 * count` slots) so that near-white
/// entries can be dropped and still leave enough candidates. An image made
/// only of near-white or transparent pixels yields an empty list.
pub fn dominant_colors(img: &DynamicImage, count: usize) -> Vec<Color> {
    let small = imageops::resize(&img.to_rgba8(), SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Nearest);
    let palette = quantize(&small, count * 2);

    let colors: Vec<Color> = palette
        .iter()
        .map(|entry| entry.color)
        .filter(|&c| brightness(c) < NEAR_WHITE)
        .take(count)
        .collect();

    debug!(
        palette_size = palette.len(),
        kept = colors.len(),
        "Extracted dominant colors"
    );
    colors
}

/// Reduces the opaque pixels of `pixels` to at most `slots` colors, ranked by
/// pixel count (descending, ties broken by color value).
///
/// Images with no more distinct colors than slots keep their exact colors;
/// anything richer is clustered with k-means in sRGB space.
pub fn quantize(pixels: &RgbaImage, slots: usize) -> Vec<PaletteEntry> {
    let opaque: Vec<[u8; 3]> = pixels
        .pixels()
        .filter(|p| p[3] >= MIN_ALPHA)
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    if opaque.is_empty() || slots == 0 {
        return Vec::new();
    }

    let mut histogram: HashMap<[u8; 3], u32> = HashMap::new();
    for rgb in &opaque {
        *histogram.entry(*rgb).or_insert(0) += 1;
    }

    let mut entries: Vec<PaletteEntry> = if histogram.len() <= slots {
        histogram
            .into_iter()
            .map(|(rgb, count)| PaletteEntry {
                color: Rgb(rgb),
                count,
            })
            .collect()
    } else {
        cluster(&opaque, slots)
    };

    entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.color.0.cmp(&b.color.0)));
    entries
}

fn cluster(opaque: &[[u8; 3]], slots: usize) -> Vec<PaletteEntry> {
    let buf: Vec<Srgb> = opaque
        .iter()
        .map(|&[r, g, b]| Srgb::new(r, g, b).into_format())
        .collect();

    let result = get_kmeans(
        slots,
        KMEANS_MAX_ITER,
        KMEANS_CONVERGE,
        false,
        &buf,
        KMEANS_SEED,
    );

    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    result
        .centroids
        .into_iter()
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|(centroid, count)| {
            let c: Srgb<u8> = centroid.into_format();
            PaletteEntry {
                color: Rgb([c.red, c.green, c.blue]),
                count,
            }
        })
        .collect()
}
