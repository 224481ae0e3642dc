use crate::color::{brightness, contrast_ratio, to_hex, Color, BLACK, WHITE};
use tracing::warn;

/// Contrast ratio below which a pairing is considered hard to scan.
pub const MIN_READABLE_RATIO: f32 = 3.0;

const DARK_IMAGE_AVERAGE: f32 = 80.0;
const CLAMP_TO_BLACK: f32 = 50.0;
const LIGHT_ENOUGH_FOR_BG: f32 = 200.0;
const MID_GRAY: f32 = 127.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPair {
    pub fg: Color,
    pub bg: Color,
}

impl ColorPair {
    pub fn contrast_ratio(&self) -> f32 {
        contrast_ratio(self.fg, self.bg)
    }

    pub fn is_readable(&self) -> bool {
        self.contrast_ratio() >= MIN_READABLE_RATIO
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        Self { fg: BLACK, bg: WHITE }
    }
}

/// Which rule produced a [`ColorPair`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Selection {
    /// No candidates, black on white.
    Default,
    /// Candidates average darker than 80.
    DarkDominant,
    /// A single candidate paired with black or white.
    SingleColor,
    /// Highest-contrast pair among the candidates.
    BestPair { ratio: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Choice {
    pub pair: ColorPair,
    pub selection: Selection,
}

/// Picks foreground and background colors from logo candidates.
pub fn select_pair(candidates: &[Color]) -> Choice {
    if candidates.is_empty() {
        return Choice {
            pair: ColorPair::default(),
            selection: Selection::Default,
        };
    }

    let average = candidates.iter().map(|&c| brightness(c)).sum::<f32>() / candidates.len() as f32;

    if average < DARK_IMAGE_AVERAGE {
        return Choice {
            pair: dark_dominant(candidates),
            selection: Selection::DarkDominant,
        };
    }

    if let [only] = candidates {
        let pair = if brightness(*only) > MID_GRAY {
            ColorPair { fg: BLACK, bg: *only }
        } else {
            ColorPair { fg: *only, bg: WHITE }
        };
        return Choice {
            pair,
            selection: Selection::SingleColor,
        };
    }

    let (pair, ratio) = best_pair(candidates);
    if ratio < MIN_READABLE_RATIO {
        warn!(
            fg = %to_hex(pair.fg),
            bg = %to_hex(pair.bg),
            ratio,
            "Best logo color pair has low contrast, the QR code may be hard to scan"
        );
    }

    Choice {
        pair,
        selection: Selection::BestPair { ratio },
    }
}

fn dark_dominant(candidates: &[Color]) -> ColorPair {
    let by_brightness = |a: &&Color, b: &&Color| brightness(**a).total_cmp(&brightness(**b));

    // Non-empty, checked by the caller.
    let darkest = *candidates.iter().min_by(by_brightness).unwrap_or(&BLACK);
    let lightest = *candidates.iter().max_by(by_brightness).unwrap_or(&WHITE);

    let fg = if brightness(darkest) < CLAMP_TO_BLACK {
        BLACK
    } else {
        darkest
    };
    let bg = if brightness(lightest) >= LIGHT_ENOUGH_FOR_BG {
        lightest
    } else {
        WHITE
    };

    ColorPair { fg, bg }
}

fn best_pair(candidates: &[Color]) -> (ColorPair, f32) {
    let mut best = ColorPair {
        fg: candidates[0],
        bg: candidates[0],
    };
    let mut best_ratio = 0.0f32;

    for (i, &a) in candidates.iter().enumerate() {
        for (j, &b) in candidates.iter().enumerate() {
            if i == j {
                continue;
            }
            let ratio = contrast_ratio(a, b);
            if ratio > best_ratio {
                best_ratio = ratio;
                best = if brightness(a) <= brightness(b) {
                    ColorPair { fg: a, bg: b }
                } else {
                    ColorPair { fg: b, bg: a }
                };
            }
        }
    }

    (best, best_ratio)
}
