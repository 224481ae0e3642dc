use image::Rgb;
use thiserror::Error;

pub type Color = Rgb<u8>;

pub const BLACK: Color = Rgb([0, 0, 0]);
pub const WHITE: Color = Rgb([255, 255, 255]);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("invalid hex color '{0}', expected #RRGGBB or #RGB")]
    Hex(String),

    #[error("RGB must have 3 comma-separated numbers in 0..=255, got '{0}'")]
    Triple(String),

    #[error("use #RRGGBB or R,G,B format for colors, got '{0}'")]
    Format(String),
}

/// Parses `#RRGGBB`, `#RGB` or `R,G,B` into a color.
///
/// Used directly as a clap `value_parser`, so failures surface as usage errors.
pub fn parse_color(input: &str) -> Result<Color, ParseColorError> {
    let s = input.trim();

    if let Some(hex) = s.strip_prefix('#') {
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(ParseColorError::Hex(input.to_string())),
        };
        if !expanded.is_ascii() {
            return Err(ParseColorError::Hex(input.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| ParseColorError::Hex(input.to_string()))
        };
        return Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]));
    }

    if s.contains(',') {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseColorError::Triple(input.to_string()))?;

        return match parts[..] {
            [r, g, b] => Ok(Rgb([r, g, b])),
            _ => Err(ParseColorError::Triple(input.to_string())),
        };
    }

    Err(ParseColorError::Format(input.to_string()))
}

/// Perceived brightness (ITU-R BT.601 weights), 0.0 to 255.0.
pub fn brightness(c: Color) -> f32 {
    let [r, g, b] = c.0;
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// `(L_light + 0.05) / (L_dark + 0.05)` with brightness normalized to [0, 1].
/// Symmetric in its arguments; 1.0 for identical colors, 21.0 for black on white.
pub fn contrast_ratio(a: Color, b: Color) -> f32 {
    let la = brightness(a) / 255.0;
    let lb = brightness(b) / 255.0;
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    (light + 0.05) / (dark + 0.05)
}

pub fn to_hex(c: Color) -> String {
    let [r, g, b] = c.0;
    format!("#{r:02X}{g:02X}{b:02X}")
}
