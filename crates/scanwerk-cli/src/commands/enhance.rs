// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhance command — the quick "auto" path: document style only, no
// boundary detection or rectification.

use std::path::PathBuf;

use clap::Args;
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::ScanConfig;
use scanwerk_pipeline::ScanService;
use tracing::info;

use super::StyleOpts;

/// Arguments for the enhance command.
#[derive(Args, Debug)]
pub struct EnhanceArgs {
    /// Input photo (JPEG, PNG, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output document image
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    style: StyleOpts,
}

pub async fn run(args: EnhanceArgs) -> Result<()> {
    let image = image::open(&args.input).map_err(|err| {
        ScanError::ImageError(format!("failed to open {}: {err}", args.input.display()))
    })?;

    let style = args.style.to_config();
    let service = ScanService::new(ScanConfig {
        style: style.clone(),
        ..ScanConfig::default()
    });

    let document = service.render_auto(image, style).await?;

    document.save(&args.output).map_err(|err| {
        ScanError::ImageError(format!("failed to save {}: {err}", args.output.display()))
    })?;
    info!(path = %args.output.display(), "document written");
    println!("enhanced document written to {}", args.output.display());

    Ok(())
}
