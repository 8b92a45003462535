// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-run tracking state.
//!
//! The session bundles everything that changes while annotating: the click
//! cycle, the recorded series, and the scale and timestamp of the frame on
//! screen. The driver owns exactly one session and passes it by reference.

use super::cycle::{AnnotationCycle, ClickOutcome};
use super::recorder::SessionRecorder;
use crate::error::Result;
use crate::models::landmark::{DisplayPoint, Point};
use crate::models::sample::Series;

#[derive(Debug)]
pub struct Session {
    cycle: AnnotationCycle,
    recorder: SessionRecorder,
    scale: f64,
    elapsed: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            cycle: AnnotationCycle::new(),
            recorder: SessionRecorder::new(),
            scale: 1.0,
            elapsed: 0.0,
        }
    }

    /// Switch to a newly displayed frame.
    pub fn enter_frame(&mut self, scale: f64, elapsed: f64) {
        self.scale = scale;
        self.elapsed = elapsed;
    }

    /// Feed a click through the cycle; a completed sample goes to the recorder.
    pub fn on_click(&mut self, click: DisplayPoint) -> Result<ClickOutcome> {
        let outcome = self.cycle.on_click(click, self.scale, self.elapsed)?;
        if let Some(sample) = outcome.sample {
            self.recorder.append(sample);
            log::info!(
                "Frame {} | t={:.3}s | t1={:.3} rad, t2={:.3} rad",
                self.recorder.len(),
                sample.elapsed,
                sample.angle1,
                sample.angle2
            );
        }
        Ok(outcome)
    }

    pub fn cycle(&self) -> &AnnotationCycle {
        &self.cycle
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn anchor(&self) -> Option<Point> {
        self.cycle.anchor()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Everything recorded so far.
    pub fn drain(&self) -> Series {
        self.recorder.drain()
    }
}
