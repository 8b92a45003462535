// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Click-cycle state machine.
//!
//! Each cycle collects pivot, first mass and second mass in that order.
//! The pivot of the first completed cycle becomes the anchor: every later
//! cycle starts with it already filled in and only asks for the two masses.
//! The cycle only follows the click sequence and knows nothing about frames.

use crate::error::Result;
use crate::models::landmark::{DisplayPoint, Landmark, LandmarkSet, Point};
use crate::models::sample::Sample;
use crate::util::geometry::{angle_from_vertical, to_source};

/// Whether the anchor pivot has been fixed yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PivotMode {
    /// No cycle has completed; the next cycle starts at the pivot.
    AwaitingFirstPivot,
    /// The anchor pivot, pre-filled into every new cycle.
    Fixed(Point),
}

/// Draw command for the display surface: a marker and its label at the
/// clicked display position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub at: DisplayPoint,
    pub landmark: Landmark,
}

/// What a single click produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickOutcome {
    pub marker: Marker,
    /// Set when this click completed a cycle.
    pub sample: Option<Sample>,
}

#[derive(Debug, Clone)]
pub struct AnnotationCycle {
    mode: PivotMode,
    landmarks: LandmarkSet,
    index: usize,
}

impl Default for AnnotationCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationCycle {
    pub fn new() -> Self {
        Self {
            mode: PivotMode::AwaitingFirstPivot,
            landmarks: LandmarkSet::default(),
            index: 0,
        }
    }

    /// Record a click made at `click` on a display scaled by `scale`.
    ///
    /// The third click of a cycle produces a [`Sample`] stamped with
    /// `elapsed`, fixes the anchor pivot if it was not yet fixed, and
    /// restarts the cycle at the first mass.
    pub fn on_click(&mut self, click: DisplayPoint, scale: f64, elapsed: f64) -> Result<ClickOutcome> {
        let point = to_source(click.x, click.y, scale)?;
        let landmark = self.next_expected();
        self.landmarks.set(landmark, point);
        self.index += 1;

        let marker = Marker { at: click, landmark };
        let sample = match self.landmarks.complete() {
            Some((pivot, mass1, mass2)) => {
                let angle1 = angle_from_vertical(&pivot, &mass1);
                let angle2 = angle_from_vertical(&mass1, &mass2);
                let anchor = match self.mode {
                    PivotMode::AwaitingFirstPivot => pivot,
                    PivotMode::Fixed(anchor) => anchor,
                };
                self.mode = PivotMode::Fixed(anchor);
                self.landmarks = LandmarkSet::with_pivot(anchor);
                self.index = 1;
                Some(Sample::new(elapsed, pivot, mass1, mass2, angle1, angle2))
            }
            None => None,
        };

        Ok(ClickOutcome { marker, sample })
    }

    /// Landmark the next click will fill.
    pub fn next_expected(&self) -> Landmark {
        // index is reset to 1 as soon as it would reach 3
        Landmark::at(self.index).unwrap_or(Landmark::Mass1)
    }

    /// Position in [`Landmark::ORDER`] of the next click.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> PivotMode {
        self.mode
    }

    pub fn anchor(&self) -> Option<Point> {
        match self.mode {
            PivotMode::AwaitingFirstPivot => None,
            PivotMode::Fixed(anchor) => Some(anchor),
        }
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    /// Moving to the next frame needs at least one point placed in the session.
    pub fn can_advance(&self) -> bool {
        self.index != 0
    }
}
