use crate::args::Args;
use crate::caption::CaptionStyle;
use crate::color::{Color, BLACK, WHITE};
use crate::contrast::ColorPair;
use crate::error::{Error, Result};
use crate::font::{default_sources, FontSource};
use crate::logo::LogoStyle;
use image::Rgb;
use qrcode::EcLevel;
use std::path::PathBuf;

/// Widest quiet zone accepted, in modules.
pub const MAX_BORDER: u32 = 20;

/// Colors used for anything the user did not set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorDefaults {
    pub fg: Color,
    pub bg: Color,
    pub strip_bg: Color,
    pub text_color: Color,
}

impl Default for ColorDefaults {
    fn default() -> Self {
        Self {
            fg: Rgb([0x22, 0x22, 0x22]),
            bg: WHITE,
            strip_bg: WHITE,
            text_color: BLACK,
        }
    }
}

/// Colors given explicitly on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorOverrides {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub strip_bg: Option<Color>,
    pub text_color: Option<Color>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedColors {
    pub qr: ColorPair,
    pub caption: CaptionStyle,
}

impl ColorDefaults {
    /// Merges user choices, logo-derived colors and defaults.
    ///
    /// A logo pair replaces the QR colors. Strip and text colors follow the
    /// logo pair only where the user left them unset.
    pub fn resolve(&self, user: &ColorOverrides, logo: Option<ColorPair>) -> ResolvedColors {
        let qr = match logo {
            Some(pair) => pair,
            None => ColorPair {
                fg: user.fg.unwrap_or(self.fg),
                bg: user.bg.unwrap_or(self.bg),
            },
        };

        let (strip_bg, text_color) = match logo {
            Some(pair) => (
                user.strip_bg.unwrap_or(pair.bg),
                user.text_color.unwrap_or(pair.fg),
            ),
            None => (
                user.strip_bg.unwrap_or(self.strip_bg),
                user.text_color.unwrap_or(self.text_color),
            ),
        };

        ResolvedColors {
            qr,
            caption: CaptionStyle {
                strip_bg,
                text_color,
            },
        }
    }
}

/// Validated settings for one run.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub url: String,
    pub output: PathBuf,
    pub size: u32,
    pub border: u32,
    pub ec_level: EcLevel,
    pub defaults: ColorDefaults,
    pub colors: ColorOverrides,
    pub logo: Option<PathBuf>,
    pub logo_style: LogoStyle,
    pub use_logo_colors: bool,
    pub caption: Option<String>,
    pub fonts: Vec<FontSource>,
}

impl RenderConfig {
    pub fn new(url: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output: output.into(),
            size: 1200,
            border: 4,
            ec_level: EcLevel::H,
            defaults: ColorDefaults::default(),
            colors: ColorOverrides::default(),
            logo: None,
            logo_style: LogoStyle::default(),
            use_logo_colors: false,
            caption: None,
            fonts: default_sources(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::Config("--size must be at least 1".to_string()));
        }
        if self.border > MAX_BORDER {
            return Err(Error::Config(format!(
                "--border must be at most {MAX_BORDER} modules, got {}",
                self.border
            )));
        }
        if !(self.logo_style.scale > 0.0 && self.logo_style.scale <= 1.0) {
            return Err(Error::Config(format!(
                "--logo-scale must be in (0, 1], got {}",
                self.logo_style.scale
            )));
        }
        if !(0.0..=0.5).contains(&self.logo_style.round) {
            return Err(Error::Config(format!(
                "--logo-round must be in [0, 0.5], got {}",
                self.logo_style.round
            )));
        }
        Ok(())
    }
}

impl TryFrom<Args> for RenderConfig {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self> {
        let mut config = Self::new(args.url, args.output);
        config.size = args.size;
        config.border = args.border;
        config.ec_level = args.error_correction.into();
        config.colors = ColorOverrides {
            fg: args.fg,
            bg: args.bg,
            strip_bg: args.strip_bg,
            text_color: args.text_color,
        };
        config.logo = args.logo;
        config.logo_style = LogoStyle {
            scale: args.logo_scale,
            round: args.logo_round,
        };
        config.use_logo_colors = args.use_logo_colors;
        config.caption = args.caption;
        if let Some(font) = args.font {
            config.fonts.insert(0, FontSource::File(font));
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    const NAVY: Color = Rgb([20, 30, 90]);
    const CREAM: Color = Rgb([250, 240, 220]);

    fn logo_pair() -> Option<ColorPair> {
        Some(ColorPair { fg: NAVY, bg: CREAM })
    }

    #[test]
    fn defaults_apply_without_user_or_logo_colors() {
        let resolved = ColorDefaults::default().resolve(&ColorOverrides::default(), None);
        assert_eq!(
            resolved,
            ResolvedColors {
                qr: ColorPair {
                    fg: Rgb([0x22, 0x22, 0x22]),
                    bg: WHITE
                },
                caption: CaptionStyle {
                    strip_bg: WHITE,
                    text_color: BLACK
                },
            }
        );
    }

    #[test]
    fn user_colors_win_without_logo() {
        let user = ColorOverrides {
            fg: Some(NAVY),
            text_color: Some(CREAM),
            ..Default::default()
        };
        let resolved = ColorDefaults::default().resolve(&user, None);
        assert_eq!(resolved.qr, ColorPair { fg: NAVY, bg: WHITE });
        assert_eq!(resolved.caption.text_color, CREAM);
        assert_eq!(resolved.caption.strip_bg, WHITE);
    }

    #[test]
    fn logo_colors_fill_unset_caption_colors() {
        let resolved = ColorDefaults::default().resolve(&ColorOverrides::default(), logo_pair());
        assert_eq!(resolved.qr, ColorPair { fg: NAVY, bg: CREAM });
        assert_eq!(
            resolved.caption,
            CaptionStyle {
                strip_bg: CREAM,
                text_color: NAVY
            }
        );
    }

    #[test]
    fn explicit_caption_colors_survive_logo_colors() {
        let user = ColorOverrides {
            fg: Some(WHITE),
            strip_bg: Some(BLACK),
            ..Default::default()
        };
        let resolved = ColorDefaults::default().resolve(&user, logo_pair());
        assert_eq!(resolved.qr, ColorPair { fg: NAVY, bg: CREAM });
        assert_eq!(resolved.caption.strip_bg, BLACK);
        assert_eq!(resolved.caption.text_color, NAVY);
    }

    #[test]
    fn custom_defaults_are_respected() {
        let defaults = ColorDefaults {
            strip_bg: CREAM,
            ..Default::default()
        };
        let resolved = defaults.resolve(&ColorOverrides::default(), None);
        assert_eq!(resolved.caption.strip_bg, CREAM);
    }

    #[test]
    fn builds_from_cli_arguments() {
        let args = Args::parse_from([
            "qr-card",
            "--url",
            "https://example.com/album",
            "--fg",
            "#102030",
            "--logo-scale",
            "0.15",
            "--font",
            "/tmp/custom.ttf",
            "-e",
            "Q",
        ]);
        let config = RenderConfig::try_from(args).unwrap();
        assert_eq!(config.url, "https://example.com/album");
        assert_eq!(config.output, PathBuf::from("qr_card.png"));
        assert_eq!(config.size, 1200);
        assert_eq!(config.border, 4);
        assert_eq!(config.ec_level, EcLevel::Q);
        assert_eq!(config.colors.fg, Some(Rgb([0x10, 0x20, 0x30])));
        assert_eq!(config.colors.bg, None);
        assert_eq!(config.logo_style.scale, 0.15);
        assert_eq!(config.fonts[0], FontSource::File("/tmp/custom.ttf".into()));
        assert!(!config.use_logo_colors);
    }

    #[test]
    fn malformed_color_is_a_usage_error() {
        let result = Args::try_parse_from(["qr-card", "--url", "x", "--bg", "#12345"]);
        let err = result.err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn url_is_required() {
        assert!(Args::try_parse_from(["qr-card"]).is_err());
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let mut config = RenderConfig::new("x", "out.png");
        assert!(config.validate().is_ok());

        config.size = 0;
        assert!(config.validate().is_err());

        config.size = 100;
        config.logo_style.scale = 1.5;
        assert!(config.validate().is_err());

        config.logo_style.scale = 0.2;
        config.logo_style.round = 0.7;
        assert!(config.validate().is_err());

        config.logo_style.round = 0.25;
        config.border = MAX_BORDER;
        assert!(config.validate().is_ok());

        config.border = MAX_BORDER + 1;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.border = 3_000_000_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn huge_border_from_cli_is_rejected() {
        let args = Args::parse_from(["qr-card", "--url", "x", "--border", "100000"]);
        assert!(matches!(RenderConfig::try_from(args), Err(Error::Config(_))));
    }

    #[test]
    fn empty_url_is_accepted() {
        let config = RenderConfig::new("", "out.png");
        assert!(config.validate().is_ok());
    }
}
