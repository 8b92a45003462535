// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the pendulum tracker.

use thiserror::Error;

/// Failures that end a tracking run.
///
/// An empty series at save time is not listed here: it is reported through
/// [`crate::io::serialization::SaveOutcome::NothingToSave`].
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The video source could not be opened
    #[error("video source unavailable: {0}")]
    SourceUnavailable(String),

    /// A display scale factor that is zero, negative or not finite
    #[error("invalid display scale: {0}")]
    InvalidScale(f64),

    /// Construction-time parameters rejected by validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A frame could not be decoded after the source was opened
    #[error("frame decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[cfg(feature = "video-opencv")]
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),
}

/// Convenience alias for results carrying a [`TrackerError`].
pub type Result<T> = std::result::Result<T, TrackerError>;
