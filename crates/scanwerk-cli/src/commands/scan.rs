// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan command — the full pipeline: detect the page (or accept corners),
// rectify the original, render the document style, save.

use std::path::PathBuf;

use clap::Args;
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{CornerQuad, Point2D, ScanConfig};
use scanwerk_pipeline::ScanService;
use scanwerk_vision::WorkingCopy;
use tracing::{info, warn};

use super::StyleOpts;

/// Arguments for the scan command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Input photo (JPEG, PNG, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output document image
    #[arg(short, long)]
    output: PathBuf,

    /// Corners in original-image space as "x,y;x,y;x,y;x,y", skipping
    /// detection (e.g. corners exported by the detect command or adjusted
    /// by an interactive caller)
    #[arg(long)]
    corners: Option<String>,

    /// Edge sensitivity (Canny high threshold)
    #[arg(short, long, default_value_t = 100.0)]
    sensitivity: f32,

    #[command(flatten)]
    style: StyleOpts,
}

pub async fn run(args: ScanArgs) -> Result<()> {
    let original = image::open(&args.input).map_err(|err| {
        ScanError::ImageError(format!("failed to open {}: {err}", args.input.display()))
    })?;

    let mut config = ScanConfig::default();
    config.detection.sensitivity = args.sensitivity;
    config.style = args.style.to_config();
    let service = ScanService::new(config.clone());

    let corners = match &args.corners {
        Some(text) => parse_corners(text)?,
        None => {
            let working =
                WorkingCopy::from_original(&original, config.detection.max_working_dimension)?;
            let detection = service
                .detect(working.image.clone())
                .await?
                .ok_or_else(|| ScanError::Worker("detection request was superseded".into()))?;
            if detection.fallback {
                warn!("no page boundary found; scanning the default inset region");
            }
            detection.corners.to_original_space(working.scale_factor)
        }
    };

    let document = service
        .rectify_and_render(original, corners, config.style)
        .await?;

    document.save(&args.output).map_err(|err| {
        ScanError::ImageError(format!("failed to save {}: {err}", args.output.display()))
    })?;
    info!(path = %args.output.display(), "document written");
    println!("scanned document written to {}", args.output.display());

    Ok(())
}

/// Parse a "x,y;x,y;x,y;x,y" corner list. The points may be in any order;
/// they are arranged canonically.
fn parse_corners(text: &str) -> Result<CornerQuad> {
    let mut points = [Point2D::new(0.0, 0.0); 4];
    let parts: Vec<&str> = text.split(';').collect();
    if parts.len() != 4 {
        return Err(ScanError::InvalidConfig(format!(
            "expected 4 corners separated by ';', got {}",
            parts.len()
        )));
    }

    for (slot, part) in points.iter_mut().zip(&parts) {
        let (x, y) = part.split_once(',').ok_or_else(|| {
            ScanError::InvalidConfig(format!("corner '{part}' is not of the form x,y"))
        })?;
        let x: f64 = x.trim().parse().map_err(|_| {
            ScanError::InvalidConfig(format!("corner '{part}' has a non-numeric x"))
        })?;
        let y: f64 = y.trim().parse().map_err(|_| {
            ScanError::InvalidConfig(format!("corner '{part}' has a non-numeric y"))
        })?;
        *slot = Point2D::new(x, y);
    }

    Ok(CornerQuad::from_unordered(points))
}
