// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media sources (image sequences and videos).
//!
//! This module decodes the frames the user annotates. A directory of still
//! images is read with the `image` crate; video files go through OpenCV
//! when the `video-opencv` feature is enabled.

use crate::error::{Result, TrackerError};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Frame rate assumed for image sequences when none is given.
pub const DEFAULT_SEQUENCE_FPS: f64 = 30.0;

const SEQUENCE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// One decoded raster frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbImage,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A stream of frames at a fixed rate.
pub trait VideoSource {
    /// Frames per second of the source.
    fn fps(&self) -> f64;

    /// Decode the next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Release the underlying handle. Called once when the run ends.
    fn release(&mut self) {}
}

impl<T: VideoSource + ?Sized> VideoSource for Box<T> {
    fn fps(&self) -> f64 {
        (**self).fps()
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        (**self).next_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Open `path` as a frame source.
///
/// Directories are read as image sequences; anything else is treated as a
/// video file. `fps` overrides the rate reported by the source.
pub fn open_source(path: &Path, fps: Option<f64>) -> Result<Box<dyn VideoSource + Send>> {
    if path.is_dir() {
        let source = ImageSequenceSource::open(path, fps.unwrap_or(DEFAULT_SEQUENCE_FPS))?;
        return Ok(Box::new(source));
    }
    if !path.exists() {
        return Err(TrackerError::SourceUnavailable(format!("{} does not exist", path.display())));
    }
    open_video_file(path, fps)
}

#[cfg(feature = "video-opencv")]
fn open_video_file(path: &Path, fps: Option<f64>) -> Result<Box<dyn VideoSource + Send>> {
    Ok(Box::new(opencv_source::OpenCvSource::open(path, fps)?))
}

#[cfg(not(feature = "video-opencv"))]
fn open_video_file(path: &Path, _fps: Option<f64>) -> Result<Box<dyn VideoSource + Send>> {
    Err(TrackerError::SourceUnavailable(format!(
        "{}: video files need the video-opencv feature, pass a directory of frames instead",
        path.display()
    )))
}

/// Still images in a directory, played back in file-name order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    files: Vec<PathBuf>,
    next: usize,
    fps: f64,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path, fps: f64) -> Result<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(TrackerError::InvalidConfig(format!("fps must be positive, got {}", fps)));
        }
        let entries = std::fs::read_dir(dir)
            .map_err(|e| TrackerError::SourceUnavailable(format!("{}: {}", dir.display(), e)))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .map(|ext| SEQUENCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(TrackerError::SourceUnavailable(format!(
                "no image frames found in {}",
                dir.display()
            )));
        }

        log::info!("Opened image sequence: {} ({} frames)", dir.display(), files.len());
        Ok(Self { files, next: 0, fps })
    }
}

impl VideoSource for ImageSequenceSource {
    fn fps(&self) -> f64 {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let image = image::open(path)?.to_rgb8();
        Ok(Some(Frame::new(image)))
    }
}

#[cfg(feature = "video-opencv")]
mod opencv_source {
    use super::{Frame, VideoSource};
    use crate::error::{Result, TrackerError};
    use image::RgbImage;
    use opencv::{
        core::Mat,
        imgproc,
        prelude::*,
        videoio::{self, VideoCapture, CAP_PROP_FPS},
    };
    use std::path::Path;

    /// A video file decoded by OpenCV.
    pub struct OpenCvSource {
        capture: VideoCapture,
        fps: f64,
    }

    impl OpenCvSource {
        pub fn open(path: &Path, fps: Option<f64>) -> Result<Self> {
            let name = path.to_string_lossy();
            log::info!("Opening video file: {}", name);
            let capture = VideoCapture::from_file(&name, videoio::CAP_ANY)?;
            if !capture.is_opened()? {
                return Err(TrackerError::SourceUnavailable(format!("cannot open {}", name)));
            }

            let fps = match fps {
                Some(fps) => fps,
                None => capture.get(CAP_PROP_FPS)?,
            };
            if !(fps.is_finite() && fps > 0.0) {
                return Err(TrackerError::SourceUnavailable(format!(
                    "{} reports an unusable frame rate ({})",
                    name, fps
                )));
            }

            Ok(Self { capture, fps })
        }
    }

    impl VideoSource for OpenCvSource {
        fn fps(&self) -> f64 {
            self.fps
        }

        fn next_frame(&mut self) -> Result<Option<Frame>> {
            let mut bgr = Mat::default();
            if !self.capture.read(&mut bgr)? || bgr.empty() {
                return Ok(None);
            }

            let mut rgb = Mat::default();
            imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
            let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
            let pixels = rgb.data_bytes()?.to_vec();

            let image = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
                TrackerError::Decode(format!("unexpected frame layout {}x{}", width, height))
            })?;
            Ok(Some(Frame::new(image)))
        }

        fn release(&mut self) {
            if let Err(e) = self.capture.release() {
                log::warn!("Failed to release video capture: {}", e);
            }
        }
    }
}
