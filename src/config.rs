// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Construction-time parameters of the tracker.

use crate::error::{Result, TrackerError};
use crate::io::serialization::DEFAULT_TABLE_NAME;
use std::path::PathBuf;

pub const DEFAULT_DISPLAY_WIDTH: u32 = 1200;
pub const DEFAULT_FRAME_SKIP: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Width in pixels every frame is scaled to for display
    pub display_width: u32,
    /// Keep one frame out of every `frame_skip`
    pub frame_skip: u64,
    /// Position table; the raw array goes next to it with a `.npy` extension
    pub output: PathBuf,
    /// Frame rate to use instead of the one reported by the source
    pub fps: Option<f64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            display_width: DEFAULT_DISPLAY_WIDTH,
            frame_skip: DEFAULT_FRAME_SKIP,
            output: PathBuf::from(DEFAULT_TABLE_NAME),
            fps: None,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.display_width == 0 {
            return Err(TrackerError::InvalidConfig("display width must be positive".into()));
        }
        if self.frame_skip == 0 {
            return Err(TrackerError::InvalidConfig("frame skip must be at least 1".into()));
        }
        if let Some(fps) = self.fps {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(TrackerError::InvalidConfig(format!("fps must be positive, got {}", fps)));
            }
        }
        Ok(())
    }
}
