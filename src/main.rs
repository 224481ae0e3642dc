mod args;
mod caption;
mod color;
mod config;
mod contrast;
mod dominant;
mod error;
mod font;
mod logging;
mod logo;
mod pdf;
mod qr;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use color::to_hex;
use config::{RenderConfig, ResolvedColors};
use contrast::ColorPair;
use font::CaptionFont;
use image::{DynamicImage, ImageFormat};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug)]
struct Outputs {
    png: PathBuf,
    pdf: PathBuf,
    colors: ResolvedColors,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    let config = RenderConfig::try_from(args)?;
    let outputs = run(&config)?;

    info!(
        fg = %to_hex(outputs.colors.qr.fg),
        bg = %to_hex(outputs.colors.qr.bg),
        "Done"
    );
    println!("Saved: {}", outputs.png.display());
    println!("Saved PDF: {}", outputs.pdf.display());
    Ok(())
}

fn run(config: &RenderConfig) -> Result<Outputs> {
    let logo = config
        .logo
        .as_ref()
        .map(|path| {
            image::open(path).with_context(|| format!("Failed to open logo {}", path.display()))
        })
        .transpose()?;

    let logo_pair = if config.use_logo_colors {
        logo_colors(logo.as_ref())
    } else {
        None
    };

    let colors = config.defaults.resolve(&config.colors, logo_pair);
    if !colors.qr.is_readable() {
        warn!(
            fg = %to_hex(colors.qr.fg),
            bg = %to_hex(colors.qr.bg),
            ratio = colors.qr.contrast_ratio(),
            "Low contrast between foreground and background, the QR code may not scan"
        );
    }

    info!(url = %config.url, fg = %to_hex(colors.qr.fg), bg = %to_hex(colors.qr.bg), "Generating QR code");
    let mut img = qr::render(
        &config.url,
        config.ec_level,
        config.border,
        config.size,
        colors.qr,
    )
    .context("Failed to render QR code")?;

    if let Some(logo) = &logo {
        info!(width = logo.width(), height = logo.height(), "Adding logo");
        logo::add_logo(&mut img, logo, config.logo_style);
    }

    if let Some(text) = &config.caption {
        let font = CaptionFont::load(&config.fonts);
        img = caption::add_caption_strip(&img, text, &font, colors.caption);
    }

    img.save_with_format(&config.output, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    let pdf = pdf::pdf_path(&config.output);
    pdf::write_pdf(&img, &pdf).with_context(|| format!("Failed to write {}", pdf.display()))?;

    Ok(Outputs {
        png: config.output.clone(),
        pdf,
        colors,
    })
}

/// Colors derived from the logo, or `None` to keep manual/default colors.
fn logo_colors(logo: Option<&DynamicImage>) -> Option<ColorPair> {
    let Some(logo) = logo else {
        warn!("--use-logo-colors needs --logo, using manual colors");
        return None;
    };

    let candidates = dominant::dominant_colors(logo, dominant::DEFAULT_COUNT);
    let hex: Vec<String> = candidates.iter().map(|&c| to_hex(c)).collect();
    info!(colors = ?hex, "Dominant logo colors");

    let choice = contrast::select_pair(&candidates);
    info!(
        selection = ?choice.selection,
        fg = %to_hex(choice.pair.fg),
        bg = %to_hex(choice.pair.bg),
        "Using logo colors"
    );
    Some(choice.pair)
}
