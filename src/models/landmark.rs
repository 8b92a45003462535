// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Landmark data structures.
//!
//! This module defines the points a user clicks on each frame and the
//! three-slot set they are collected into.

/// A 2D point in source-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D point in display-surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

impl DisplayPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One of the three landmarks clicked on a pendulum frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    Pivot,
    Mass1,
    Mass2,
}

impl Landmark {
    /// Click order within one cycle.
    pub const ORDER: [Landmark; 3] = [Landmark::Pivot, Landmark::Mass1, Landmark::Mass2];

    /// Landmark expected at `index` in the click order.
    pub fn at(index: usize) -> Option<Landmark> {
        Self::ORDER.get(index).copied()
    }

    /// Short label drawn next to the marker and used in the table header.
    pub fn label(self) -> &'static str {
        match self {
            Landmark::Pivot => "center",
            Landmark::Mass1 => "m1",
            Landmark::Mass2 => "m2",
        }
    }
}

/// The points placed so far in the current cycle.
///
/// Filled slots always form a prefix of [`Landmark::ORDER`]; only the
/// annotation cycle writes to it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LandmarkSet {
    pivot: Option<Point>,
    mass1: Option<Point>,
    mass2: Option<Point>,
}

impl LandmarkSet {
    /// A set with only the pivot filled in.
    pub fn with_pivot(pivot: Point) -> Self {
        Self {
            pivot: Some(pivot),
            ..Self::default()
        }
    }

    pub fn get(&self, landmark: Landmark) -> Option<Point> {
        match landmark {
            Landmark::Pivot => self.pivot,
            Landmark::Mass1 => self.mass1,
            Landmark::Mass2 => self.mass2,
        }
    }

    pub(crate) fn set(&mut self, landmark: Landmark, point: Point) {
        let slot = match landmark {
            Landmark::Pivot => &mut self.pivot,
            Landmark::Mass1 => &mut self.mass1,
            Landmark::Mass2 => &mut self.mass2,
        };
        *slot = Some(point);
    }

    /// All three points, once the set is complete.
    pub fn complete(&self) -> Option<(Point, Point, Point)> {
        Some((self.pivot?, self.mass1?, self.mass2?))
    }

    /// Number of filled slots.
    pub fn filled(&self) -> usize {
        Landmark::ORDER
            .iter()
            .take_while(|landmark| self.get(**landmark).is_some())
            .count()
    }
}
