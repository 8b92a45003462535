// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Trajectory samples.
//!
//! A sample is one completed click cycle: the elapsed video time, the three
//! landmark positions and the two joint angles derived from them.

use super::landmark::Point;
use serde::Serialize;

/// Number of numeric columns in a sample row.
pub const COLUMNS: usize = 9;

/// Column names, in row order.
pub const HEADER: [&str; COLUMNS] = [
    "time", "center_x", "center_y", "t1", "m1_x", "m1_y", "t2", "m2_x", "m2_y",
];

/// One completed cycle. Positions are in source-frame pixels, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    #[serde(rename = "time")]
    pub elapsed: f64,
    #[serde(rename = "center_x")]
    pub pivot_x: f64,
    #[serde(rename = "center_y")]
    pub pivot_y: f64,
    #[serde(rename = "t1")]
    pub angle1: f64,
    #[serde(rename = "m1_x")]
    pub mass1_x: f64,
    #[serde(rename = "m1_y")]
    pub mass1_y: f64,
    #[serde(rename = "t2")]
    pub angle2: f64,
    #[serde(rename = "m2_x")]
    pub mass2_x: f64,
    #[serde(rename = "m2_y")]
    pub mass2_y: f64,
}

impl Sample {
    pub fn new(elapsed: f64, pivot: Point, mass1: Point, mass2: Point, angle1: f64, angle2: f64) -> Self {
        Self {
            elapsed,
            pivot_x: pivot.x,
            pivot_y: pivot.y,
            angle1,
            mass1_x: mass1.x,
            mass1_y: mass1.y,
            angle2,
            mass2_x: mass2.x,
            mass2_y: mass2.y,
        }
    }

    pub fn pivot(&self) -> Point {
        Point::new(self.pivot_x, self.pivot_y)
    }

    /// The sample as a numeric row in [`HEADER`] order.
    pub fn to_row(&self) -> [f64; COLUMNS] {
        [
            self.elapsed,
            self.pivot_x,
            self.pivot_y,
            self.angle1,
            self.mass1_x,
            self.mass1_y,
            self.angle2,
            self.mass2_x,
            self.mass2_y,
        ]
    }
}

/// Samples in capture order.
pub type Series = Vec<Sample>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_layout_matches_header() {
        let sample = Sample::new(
            0.1,
            Point::new(60.0, 40.0),
            Point::new(75.0, 100.0),
            Point::new(85.0, 150.0),
            0.25,
            0.2,
        );
        assert_eq!(sample.to_row(), [0.1, 60.0, 40.0, 0.25, 75.0, 100.0, 0.2, 85.0, 150.0]);
        assert_eq!(HEADER[3], "t1");
        assert_eq!(sample.pivot(), Point::new(60.0, 40.0));
    }
}
