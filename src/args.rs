use crate::color::{parse_color, Color};
use clap::{Parser, ValueEnum};
use qrcode::EcLevel;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Debug)]
#[clap(rename_all = "UPPER")]
pub enum EcArg {
    L,
    M,
    Q,
    H,
}

impl From<EcArg> for EcLevel {
    fn from(v: EcArg) -> Self {
        match v {
            EcArg::L => EcLevel::L,
            EcArg::M => EcLevel::M,
            EcArg::Q => EcLevel::Q,
            EcArg::H => EcLevel::H,
        }
    }
}

#[derive(Parser)]
#[command(name = "qr-card")]
#[command(version)]
#[command(about = "Generate a styled QR code with optional logo and caption, exported as PNG and PDF")]
pub struct Args {
    /// URL (or any text) to encode
    #[arg(short, long)]
    pub url: String,

    /// Output PNG path, a PDF with the same stem is written next to it
    #[arg(short, long, default_value = "qr_card.png")]
    pub output: PathBuf,

    /// Target square size in pixels
    #[arg(short, long, default_value = "1200")]
    pub size: u32,

    /// Quiet zone border in modules
    #[arg(short, long, default_value = "4")]
    pub border: u32,

    /// Foreground color, #RRGGBB, #RGB or R,G,B [default: #222222]
    #[arg(long, value_parser = parse_color)]
    pub fg: Option<Color>,

    /// Background color [default: #FFFFFF]
    #[arg(long, value_parser = parse_color)]
    pub bg: Option<Color>,

    /// Logo image placed in the center
    #[arg(short, long)]
    pub logo: Option<PathBuf>,

    /// Caption drawn in a strip below the code
    #[arg(short, long)]
    pub caption: Option<String>,

    /// Caption strip background color [default: #FFFFFF]
    #[arg(long, value_parser = parse_color)]
    pub strip_bg: Option<Color>,

    /// Caption text color [default: #000000]
    #[arg(long, value_parser = parse_color)]
    pub text_color: Option<Color>,

    /// Logo width as a fraction of the QR width (0.10-0.30 recommended)
    #[arg(long, default_value = "0.20")]
    pub logo_scale: f32,

    /// Logo corner rounding ratio (0-0.5)
    #[arg(long, default_value = "0.25")]
    pub logo_round: f32,

    /// Derive foreground and background colors from the logo
    #[arg(long)]
    pub use_logo_colors: bool,

    /// QR code error correction level (L, M, Q, H)
    #[arg(short = 'e', long, default_value = "H")]
    pub error_correction: EcArg,

    /// Preferred caption font file, tried before the system fonts
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Enable debug logging (QR_CARD_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}
