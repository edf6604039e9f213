// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detect command — find the page boundary in a photo and export the
// annotated preview and/or the corners in original-image space.

use std::path::PathBuf;

use clap::Args;
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::ScanConfig;
use scanwerk_pipeline::ScanService;
use scanwerk_vision::WorkingCopy;
use tracing::info;

/// Arguments for the detect command.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Input photo (JPEG, PNG, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Write the annotated preview image here
    #[arg(short, long)]
    preview: Option<PathBuf>,

    /// Write the corners (original-image space, canonical order) as JSON
    #[arg(short, long)]
    corners: Option<PathBuf>,

    /// Edge sensitivity (Canny high threshold)
    #[arg(short, long, default_value_t = 100.0)]
    sensitivity: f32,
}

pub async fn run(args: DetectArgs) -> Result<()> {
    let original = image::open(&args.input).map_err(|err| {
        ScanError::ImageError(format!("failed to open {}: {err}", args.input.display()))
    })?;

    let mut config = ScanConfig::default();
    config.detection.sensitivity = args.sensitivity;
    let working = WorkingCopy::from_original(&original, config.detection.max_working_dimension)?;

    let service = ScanService::new(config);
    let detection = service
        .detect(working.image.clone())
        .await?
        .ok_or_else(|| ScanError::Worker("detection request was superseded".into()))?;

    if detection.fallback {
        println!("no page boundary found — corners are the default inset rectangle");
    } else {
        println!("page boundary detected");
    }

    let committed = detection.corners.to_original_space(working.scale_factor);
    for (label, corner) in ["top-left", "top-right", "bottom-right", "bottom-left"]
        .iter()
        .zip(committed.points())
    {
        println!("  {label}: ({:.1}, {:.1})", corner.x, corner.y);
    }

    if let Some(path) = &args.preview {
        detection.preview.save(path).map_err(|err| {
            ScanError::ImageError(format!("failed to save preview to {}: {err}", path.display()))
        })?;
        info!(path = %path.display(), "preview written");
    }

    if let Some(path) = &args.corners {
        let json = serde_json::to_string_pretty(&committed)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "corners written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};
    use scanwerk_core::CornerQuad;

    #[tokio::test]
    async fn detect_command_writes_corner_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("page.png");
        let corners_path = dir.path().join("corners.json");

        // Bright page on a dark desk.
        let mut img = GrayImage::from_pixel(320, 240, Luma([40u8]));
        for y in 40..200 {
            for x in 53..267 {
                img.put_pixel(x, y, Luma([235u8]));
            }
        }
        DynamicImage::ImageLuma8(img).save(&input).expect("save input");

        let args = DetectArgs {
            input,
            preview: None,
            corners: Some(corners_path.clone()),
            sensitivity: 100.0,
        };
        run(args).await.expect("detect command");

        let json = std::fs::read_to_string(&corners_path).expect("read corners");
        let quad: CornerQuad = serde_json::from_str(&json).expect("parse corners");
        assert!(quad.top_left().x < quad.top_right().x);
        assert!(quad.top_left().y < quad.bottom_left().y);
    }
}
