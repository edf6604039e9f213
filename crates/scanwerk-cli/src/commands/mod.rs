// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommands of the scanwerk binary.

pub mod detect;
pub mod enhance;
pub mod scan;

use clap::Args;
use scanwerk_core::{Binarization, StyleConfig};

/// Document-style options shared by the scan and enhance commands.
#[derive(Args, Debug)]
pub struct StyleOpts {
    /// Linear contrast factor
    #[arg(long, default_value_t = 2.0)]
    pub contrast: f32,

    /// Brightness offset added after the contrast factor
    #[arg(long, default_value_t = 30.0)]
    pub brightness: f32,

    /// Global binarization threshold (pixels above become white)
    #[arg(long, default_value_t = 150)]
    pub threshold: u8,

    /// Use the adaptive local threshold instead of the global cut
    #[arg(long)]
    pub adaptive: bool,

    /// Window radius for the adaptive threshold
    #[arg(long, default_value_t = 15)]
    pub block_radius: u32,

    /// Constant subtracted from the local mean in adaptive mode
    #[arg(long, default_value_t = 10)]
    pub offset: i32,

    /// Odd Gaussian kernel applied before binarization (1 disables)
    #[arg(long, default_value_t = 1)]
    pub blur_kernel: u32,
}

impl StyleOpts {
    pub fn to_config(&self) -> StyleConfig {
        let binarization = if self.adaptive {
            Binarization::Adaptive {
                block_radius: self.block_radius,
                offset: self.offset,
            }
        } else {
            Binarization::Global {
                threshold: self.threshold,
            }
        };

        StyleConfig {
            contrast: self.contrast,
            brightness: self.brightness,
            blur_kernel: self.blur_kernel,
            binarization,
        }
    }
}
