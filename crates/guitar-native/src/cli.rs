//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use guitar_core::{ContainmentPolicy, HitParams, InstrumentConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "camera-guitar")]
#[command(about = "Play a 3x3 grid of strings over the screen", long_about = None)]
pub struct Args {
    /// Directory holding sound1.wav .. sound12.wav
    #[arg(long, value_name = "DIR", default_value = "sounds")]
    pub samples: PathBuf,

    /// Initial window width (logical pixels)
    #[arg(long, default_value = "390")]
    pub width: u32,

    /// Initial window height (logical pixels)
    #[arg(long, default_value = "844")]
    pub height: u32,

    /// Safe-area inset above the top bar (logical pixels)
    #[arg(long, default_value = "0")]
    pub safe_top: f32,

    /// Safe-area inset below the bottom bar (logical pixels)
    #[arg(long, default_value = "0")]
    pub safe_bottom: f32,

    /// Require horizontal touches to fall inside the string's x-range too
    #[arg(long)]
    pub unified_containment: bool,
}

impl Args {
    pub fn instrument_config(&self) -> InstrumentConfig {
        let policy = if self.unified_containment {
            ContainmentPolicy::Unified
        } else {
            ContainmentPolicy::Legacy
        };
        log::info!("[cli] containment policy: {:?}", policy);
        InstrumentConfig {
            hit: HitParams { policy },
            ..InstrumentConfig::default()
        }
    }
}
