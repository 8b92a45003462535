// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the conversions between display-surface pixels and
//! source-frame pixels, and the pendulum angle convention.

use crate::error::{Result, TrackerError};
use crate::models::landmark::Point;

/// Scale factor that maps a source frame of `frame_width` pixels onto a
/// display `display_width` pixels wide.
pub fn display_scale(display_width: u32, frame_width: u32) -> Result<f64> {
    let scale = display_width as f64 / frame_width as f64;
    check_scale(scale)?;
    Ok(scale)
}

/// Convert display coordinates to source-frame coordinates.
pub fn to_source(display_x: f64, display_y: f64, scale: f64) -> Result<Point> {
    check_scale(scale)?;
    Ok(Point::new(display_x / scale, display_y / scale))
}

fn check_scale(scale: f64) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(TrackerError::InvalidScale(scale))
    }
}

/// Angle of the segment `from -> to` measured from straight down.
///
/// Image y grows downwards, so a mass hanging directly below its pivot is at
/// 0 and the angle is positive when the mass swings towards +x.
/// Range is (-pi, pi].
pub fn angle_from_vertical(from: &Point, to: &Point) -> f64 {
    (to.x - from.x).atan2(to.y - from.y)
}
