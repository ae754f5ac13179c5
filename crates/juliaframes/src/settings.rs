//! Validated run configuration derived from the command line.
//!
//! Types:
//!
//! - `Settings` carries everything `run.rs` needs to wire the pipeline.
//! - `SettingsError` reports values that cannot produce a usable sequence.
//!
//! The maximum texture dimension is adapter-specific and is checked by the
//! renderer once a device exists.

use std::path::PathBuf;

use animation::{FractalVariant, FrameParams, TimeRange, DEFAULT_C, MAX_FRAMES};
use renderer::{GpuPowerPreference, RendererConfig};
use thiserror::Error;

use crate::cli::Cli;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("frame count must be between 1 and {max}, got {frames}")]
    FrameCount { frames: u32, max: u32 },
    #[error("render size must be at least 1x1, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
    #[error("{name} must be finite")]
    NonFinite { name: &'static str },
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub size: (u32, u32),
    pub frames: u32,
    pub time: TimeRange,
    pub seed: u32,
    pub variant: FractalVariant,
    pub base: FrameParams,
    pub output: PathBuf,
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    pub gpu_power: GpuPowerPreference,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self, SettingsError> {
        if cli.frames == 0 || cli.frames > MAX_FRAMES {
            return Err(SettingsError::FrameCount {
                frames: cli.frames,
                max: MAX_FRAMES,
            });
        }
        if cli.width == 0 || cli.height == 0 {
            return Err(SettingsError::EmptySurface {
                width: cli.width,
                height: cli.height,
            });
        }
        for (name, value) in [
            ("time start", cli.time_start),
            ("time span", cli.time_span),
            ("rotation", cli.rotation),
        ] {
            if !value.is_finite() {
                return Err(SettingsError::NonFinite { name });
            }
        }

        Ok(Self {
            size: (cli.width, cli.height),
            frames: cli.frames,
            time: TimeRange {
                start: cli.time_start,
                span: cli.time_span,
            },
            seed: cli.seed,
            variant: cli.variant,
            base: FrameParams {
                aa_level: cli.aa_level,
                rotation: cli.rotation,
                c: DEFAULT_C,
                cam_pos: cli.cam_pos,
            },
            output: cli.output,
            vertex: cli.vertex,
            fragment: cli.fragment,
            gpu_power: cli.gpu_power,
        })
    }

    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            size: self.size,
            gpu_power: self.gpu_power,
        }
    }
}
