// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pendulum tracker - manual double-pendulum video annotation.
//!
//! The user clicks the pivot and the two masses on sampled video frames.
//! Each completed set of clicks becomes a time-stamped sample holding the
//! three positions and the two joint angles, and the whole series is saved
//! as a CSV table plus a NumPy array.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod tracking;
pub mod ui;
pub mod util;

pub use error::{Result, TrackerError};
