// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame sampling and the annotation loop.
//!
//! The driver pulls every Nth frame from a [`VideoSource`], shows it on a
//! [`DisplaySurface`] and then blocks on an [`InputSource`] for exactly one
//! event at a time. Clicks go to the session's click cycle; save, quit and
//! the end of the video all write the series and end the run.
//!
//! Moving to the next frame is refused only while no point has been placed
//! in the whole session. Once the pivot is anchored the user may move on with
//! a cycle half done, and the partial clicks carry over to the next frame.

use super::cycle::Marker;
use super::session::Session;
use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::io::media::{Frame, VideoSource};
use crate::io::serialization::{self, SaveOutcome};
use crate::models::landmark::{DisplayPoint, Landmark, Point};
use crate::models::sample::Sample;
use crate::util::geometry::display_scale;

/// Operator input, already translated from raw window events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer click in display-surface pixels
    Click(DisplayPoint),
    /// Show the next sampled frame
    Advance,
    /// Write the series and stop
    Save,
    /// Stop; the series is still written
    Quit,
    /// Any other key
    Ignored,
}

/// Source of operator input. `next_event` blocks until one arrives.
pub trait InputSource {
    fn next_event(&mut self) -> InputEvent;
}

/// Overlay text state shown over the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    pub next: Landmark,
    pub elapsed: f64,
    pub raw_index: u64,
    pub samples: usize,
    pub anchor: Option<Point>,
}

/// Where frames, overlays and markers are drawn.
pub trait DisplaySurface {
    /// Replace the displayed frame. Markers of the previous frame are dropped.
    fn show_frame(&mut self, frame: &SampledFrame, scale: f64) -> Result<()>;

    fn show_status(&mut self, status: &Status) -> Result<()>;

    fn draw_marker(&mut self, marker: &Marker) -> Result<()>;

    fn sample_recorded(&mut self, _sample: &Sample) {}

    /// Tear the surface down. Called exactly once when the run ends.
    fn close(&mut self);
}

/// A frame kept by the sampler, with its position in the raw stream.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    pub frame: Frame,
    /// 1-based count of decoded frames, skipped ones included
    pub raw_index: u64,
    /// Video time of this frame in seconds
    pub elapsed: f64,
}

/// Keeps one frame out of every `frame_skip`.
#[derive(Debug)]
pub struct FrameSampler {
    frame_skip: u64,
    fps: f64,
    raw_count: u64,
}

impl FrameSampler {
    pub fn new(frame_skip: u64, fps: f64) -> Self {
        Self {
            frame_skip: frame_skip.max(1),
            fps,
            raw_count: 0,
        }
    }

    /// Read frames until the next one to keep, or `None` at end of stream.
    pub fn next_sampled<V: VideoSource + ?Sized>(&mut self, source: &mut V) -> Result<Option<SampledFrame>> {
        while let Some(frame) = source.next_frame()? {
            self.raw_count += 1;
            if self.raw_count % self.frame_skip != 0 {
                continue;
            }
            return Ok(Some(SampledFrame {
                frame,
                raw_index: self.raw_count,
                elapsed: self.raw_count as f64 / self.fps,
            }));
        }
        Ok(None)
    }

    pub fn raw_count(&self) -> u64 {
        self.raw_count
    }
}

/// Whether the run goes on after handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue,
    Finished(SaveOutcome),
}

pub struct Driver<V: VideoSource> {
    source: V,
    sampler: FrameSampler,
    session: Session,
    config: TrackerConfig,
    raw_index: u64,
    processed: u64,
    released: bool,
}

impl<V: VideoSource> Driver<V> {
    pub fn new(source: V, config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        let fps = source.fps();
        if !(fps.is_finite() && fps > 0.0) {
            return Err(TrackerError::InvalidConfig(format!("source fps must be positive, got {}", fps)));
        }
        log::info!("Video FPS: {}", fps);
        Ok(Self {
            sampler: FrameSampler::new(config.frame_skip, fps),
            source,
            session: Session::new(),
            config,
            raw_index: 0,
            processed: 0,
            released: false,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Print the controls and show the first sampled frame.
    pub fn start(&mut self, display: &mut dyn DisplaySurface) -> Result<Flow> {
        log::info!("Click on: center -> m1 -> m2 (t1 and t2 are computed automatically)");
        log::info!("Processing 1 frame out of {}", self.config.frame_skip);
        log::info!("SPACE: next frame | q: quit | s: save and quit");
        self.advance(display)
    }

    /// Apply one input event.
    pub fn handle_event(&mut self, event: InputEvent, display: &mut dyn DisplaySurface) -> Result<Flow> {
        match event {
            InputEvent::Click(at) => {
                let outcome = self.session.on_click(at)?;
                display.draw_marker(&outcome.marker)?;
                if let Some(sample) = outcome.sample {
                    display.sample_recorded(&sample);
                }
                display.show_status(&self.status())?;
                Ok(Flow::Continue)
            }
            InputEvent::Advance => {
                if self.session.cycle().can_advance() {
                    self.advance(display)
                } else {
                    log::warn!("Mark the points before moving to the next frame");
                    Ok(Flow::Continue)
                }
            }
            InputEvent::Save => {
                log::info!("Save requested");
                self.finish()
            }
            InputEvent::Quit => {
                log::info!("Quit requested");
                self.finish()
            }
            InputEvent::Ignored => Ok(Flow::Continue),
        }
    }

    fn advance(&mut self, display: &mut dyn DisplaySurface) -> Result<Flow> {
        let next = match self.sampler.next_sampled(&mut self.source) {
            Ok(next) => next,
            Err(e) => {
                log::error!("Failed to read frame {}: {}", self.sampler.raw_count() + 1, e);
                self.save_before_error();
                return Err(e);
            }
        };
        let Some(sampled) = next else {
            log::info!("End of video");
            return self.finish();
        };

        let scale = display_scale(self.config.display_width, sampled.frame.width())?;
        self.session.enter_frame(scale, sampled.elapsed);
        self.raw_index = sampled.raw_index;
        self.processed += 1;
        log::debug!(
            "Showing frame {} (t={:.3}s, scale={:.3})",
            sampled.raw_index,
            sampled.elapsed,
            scale
        );

        display.show_frame(&sampled, scale)?;
        display.show_status(&self.status())?;
        Ok(Flow::Continue)
    }

    fn finish(&mut self) -> Result<Flow> {
        log::info!("Frames shown: {}", self.processed);
        let series = self.session.drain();
        let outcome = serialization::write(&series, &self.config.output);
        self.release();
        Ok(Flow::Finished(outcome?))
    }

    /// Keep what was recorded when the run is about to end on an error.
    fn save_before_error(&mut self) {
        match serialization::write(&self.session.drain(), &self.config.output) {
            Ok(SaveOutcome::Saved { rows, .. }) => log::info!("Saved {} samples before stopping", rows),
            Ok(SaveOutcome::NothingToSave) => {}
            Err(e) => log::error!("Failed to save samples: {}", e),
        }
        self.release();
    }

    fn status(&self) -> Status {
        Status {
            next: self.session.cycle().next_expected(),
            elapsed: self.session.elapsed(),
            raw_index: self.raw_index,
            samples: self.session.recorder().len(),
            anchor: self.session.anchor(),
        }
    }

    /// Release the video source. Later calls do nothing.
    pub fn release(&mut self) {
        if !self.released {
            self.source.release();
            self.released = true;
        }
    }
}

/// Run the annotation loop until the video ends or the operator saves or quits.
///
/// The source and the display are released on every exit path, errors included.
pub fn run<V, D, I>(driver: &mut Driver<V>, display: &mut D, input: &mut I) -> Result<SaveOutcome>
where
    V: VideoSource,
    D: DisplaySurface,
    I: InputSource,
{
    let result = drive(driver, display, input);
    driver.release();
    display.close();
    result
}

fn drive<V, D, I>(driver: &mut Driver<V>, display: &mut D, input: &mut I) -> Result<SaveOutcome>
where
    V: VideoSource,
    D: DisplaySurface,
    I: InputSource,
{
    let mut flow = driver.start(display)?;
    loop {
        match flow {
            Flow::Finished(outcome) => return Ok(outcome),
            Flow::Continue => {
                let event = input.next_event();
                flow = driver.handle_event(event, display)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::collections::VecDeque;
    use std::path::Path;

    struct FakeSource {
        remaining: usize,
        width: u32,
        fps: f64,
        released: usize,
        decoded: usize,
        corrupt_at: Option<usize>,
    }

    impl FakeSource {
        fn new(frames: usize, width: u32, fps: f64) -> Self {
            Self { remaining: frames, width, fps, released: 0, decoded: 0, corrupt_at: None }
        }

        /// Fail to decode the `n`th raw frame (1-based).
        fn corrupt_at(mut self, n: usize) -> Self {
            self.corrupt_at = Some(n);
            self
        }
    }

    impl VideoSource for FakeSource {
        fn fps(&self) -> f64 {
            self.fps
        }

        fn next_frame(&mut self) -> Result<Option<Frame>> {
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            self.decoded += 1;
            if self.corrupt_at == Some(self.decoded) {
                return Err(TrackerError::Decode("corrupt frame".into()));
            }
            Ok(Some(Frame::new(RgbImage::new(self.width, 2))))
        }

        fn release(&mut self) {
            self.released += 1;
        }
    }

    #[derive(Default)]
    struct FakeDisplay {
        frames: Vec<(u64, f64, f64)>,
        markers: Vec<Marker>,
        statuses: Vec<Status>,
        recorded: usize,
        closed: usize,
    }

    impl DisplaySurface for FakeDisplay {
        fn show_frame(&mut self, frame: &SampledFrame, scale: f64) -> Result<()> {
            self.frames.push((frame.raw_index, frame.elapsed, scale));
            self.markers.clear();
            Ok(())
        }

        fn show_status(&mut self, status: &Status) -> Result<()> {
            self.statuses.push(*status);
            Ok(())
        }

        fn draw_marker(&mut self, marker: &Marker) -> Result<()> {
            self.markers.push(*marker);
            Ok(())
        }

        fn sample_recorded(&mut self, _sample: &Sample) {
            self.recorded += 1;
        }

        fn close(&mut self) {
            self.closed += 1;
        }
    }

    /// Replays scripted events; quits once the script runs out.
    struct Script(VecDeque<InputEvent>);

    impl Script {
        fn new(events: Vec<InputEvent>) -> Self {
            Self(events.into())
        }
    }

    impl InputSource for Script {
        fn next_event(&mut self) -> InputEvent {
            self.0.pop_front().unwrap_or(InputEvent::Quit)
        }
    }

    fn click(x: f64, y: f64) -> InputEvent {
        InputEvent::Click(DisplayPoint::new(x, y))
    }

    fn config_in(dir: &Path) -> TrackerConfig {
        TrackerConfig {
            output: dir.join("positions.csv"),
            ..TrackerConfig::default()
        }
    }

    #[test]
    fn test_sampler_keeps_every_third_frame() {
        let mut source = FakeSource::new(10, 4, 30.0);
        let mut sampler = FrameSampler::new(3, 30.0);
        let mut kept = Vec::new();
        while let Some(sampled) = sampler.next_sampled(&mut source).unwrap() {
            kept.push((sampled.raw_index, sampled.elapsed));
        }
        let indices: Vec<u64> = kept.iter().map(|k| k.0).collect();
        assert_eq!(indices, vec![3, 6, 9]);
        for (i, (_, elapsed)) in kept.iter().enumerate() {
            assert!((elapsed - (i + 1) as f64 * 0.1).abs() < 1e-12);
        }
        assert_eq!(sampler.raw_count(), 10);
    }

    #[test]
    fn test_frame_skip_of_one_keeps_everything() {
        let mut source = FakeSource::new(4, 4, 25.0);
        let mut sampler = FrameSampler::new(1, 25.0);
        let mut count = 0;
        while sampler.next_sampled(&mut source).unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn test_reference_clicks_through_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        // 600 px wide frames on a 1200 px display give a scale of 2
        let mut driver = Driver::new(FakeSource::new(3, 600, 30.0), config_in(dir.path())).unwrap();
        let mut display = FakeDisplay::default();
        let mut input = Script::new(vec![click(120.0, 80.0), click(150.0, 200.0), click(170.0, 300.0), InputEvent::Save]);

        let outcome = run(&mut driver, &mut display, &mut input).unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved { rows: 1, .. }));

        assert_eq!(display.frames.len(), 1);
        let (raw_index, elapsed, scale) = display.frames[0];
        assert_eq!(raw_index, 3);
        assert!((elapsed - 0.1).abs() < 1e-12);
        assert_eq!(scale, 2.0);

        let sample = driver.session().recorder().samples()[0];
        assert_eq!((sample.pivot_x, sample.pivot_y), (60.0, 40.0));
        assert_eq!((sample.mass1_x, sample.mass1_y), (75.0, 100.0));
        assert_eq!((sample.mass2_x, sample.mass2_y), (85.0, 150.0));
        assert!((sample.angle1 - 0.2449787).abs() < 1e-6);
        assert!((sample.angle2 - 0.1973956).abs() < 1e-6);

        let labels: Vec<Landmark> = display.markers.iter().map(|m| m.landmark).collect();
        assert_eq!(labels, vec![Landmark::Pivot, Landmark::Mass1, Landmark::Mass2]);
        assert_eq!(display.recorded, 1);
        assert_eq!(display.statuses.last().unwrap().next, Landmark::Mass1);
    }

    #[test]
    fn test_first_advance_needs_a_point() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = Driver::new(FakeSource::new(9, 600, 30.0), config_in(dir.path())).unwrap();
        let mut display = FakeDisplay::default();
        let mut input = Script::new(vec![
            InputEvent::Advance,
            InputEvent::Ignored,
            click(10.0, 10.0),
            InputEvent::Advance,
            InputEvent::Quit,
        ]);

        run(&mut driver, &mut display, &mut input).unwrap();
        let shown: Vec<u64> = display.frames.iter().map(|f| f.0).collect();
        assert_eq!(shown, vec![3, 6]);
        assert_eq!(driver.processed, 2);
    }

    #[test]
    fn test_partial_cycle_carries_into_next_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = Driver::new(FakeSource::new(12, 1200, 30.0), config_in(dir.path())).unwrap();
        let mut display = FakeDisplay::default();
        let mut input = Script::new(vec![
            click(100.0, 100.0),
            click(110.0, 200.0),
            click(120.0, 300.0),
            InputEvent::Advance,
            // only m1 on this frame
            click(90.0, 200.0),
            InputEvent::Advance,
            click(80.0, 290.0),
            InputEvent::Save,
        ]);

        let outcome = run(&mut driver, &mut display, &mut input).unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved { rows: 2, .. }));

        let samples = driver.session().recorder().samples();
        assert!((samples[0].elapsed - 0.1).abs() < 1e-12);
        // the second cycle completes on the third frame shown
        assert!((samples[1].elapsed - 0.3).abs() < 1e-12);
        assert_eq!(samples[1].pivot(), Point::new(100.0, 100.0));
        assert_eq!((samples[1].mass1_x, samples[1].mass1_y), (90.0, 200.0));
    }

    #[test]
    fn test_end_of_video_saves_five_samples() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = Driver::new(FakeSource::new(15, 600, 30.0), config_in(dir.path())).unwrap();
        let mut display = FakeDisplay::default();

        let mut events = vec![click(100.0, 50.0), click(120.0, 150.0), click(140.0, 250.0), InputEvent::Advance];
        for i in 0..4 {
            let x = 110.0 + i as f64 * 5.0;
            events.extend([click(x, 150.0), click(x + 10.0, 250.0), InputEvent::Advance]);
        }
        let mut input = Script::new(events);

        let outcome = run(&mut driver, &mut display, &mut input).unwrap();
        let SaveOutcome::Saved { table, array, rows } = outcome else {
            panic!("expected a saved series");
        };
        assert_eq!(rows, 5);

        let text = std::fs::read_to_string(table).unwrap();
        assert_eq!(text.lines().count(), 6);
        let npy = std::fs::read(array).unwrap();
        let header = String::from_utf8_lossy(&npy[10..]);
        assert!(header.contains("'shape': (5, 9)"));

        let times: Vec<f64> = driver.session().recorder().samples().iter().map(|s| s.elapsed).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(display.closed, 1);
    }

    #[test]
    fn test_save_with_no_samples_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let output = config.output.clone();
        let mut driver = Driver::new(FakeSource::new(6, 600, 30.0), config).unwrap();
        let mut display = FakeDisplay::default();
        let mut input = Script::new(vec![click(1.0, 1.0), InputEvent::Save]);

        let outcome = run(&mut driver, &mut display, &mut input).unwrap();
        assert_eq!(outcome, SaveOutcome::NothingToSave);
        assert!(!output.exists());
        assert!(!output.with_extension("npy").exists());
    }

    #[test]
    fn test_empty_video_finishes_at_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = Driver::new(FakeSource::new(2, 600, 30.0), config_in(dir.path())).unwrap();
        let mut display = FakeDisplay::default();
        let mut input = Script::new(vec![]);

        let outcome = run(&mut driver, &mut display, &mut input).unwrap();
        assert_eq!(outcome, SaveOutcome::NothingToSave);
        assert!(display.frames.is_empty());
        assert_eq!(display.closed, 1);
    }

    #[test]
    fn test_resources_released_on_error() {
        let mut driver = Driver::new(FakeSource::new(3, 600, 30.0), TrackerConfig::default()).unwrap();
        let mut display = FakeDisplay::default();

        // a zero-width frame yields a zero scale denominator
        driver.source.width = 0;
        let mut input = Script::new(vec![]);
        let result = run(&mut driver, &mut display, &mut input);

        assert!(matches!(result, Err(TrackerError::InvalidScale(_))));
        assert_eq!(display.closed, 1);
        assert_eq!(driver.source.released, 1);
    }

    #[test]
    fn test_quit_saves_recorded_samples() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = Driver::new(FakeSource::new(6, 600, 30.0), config_in(dir.path())).unwrap();
        let mut display = FakeDisplay::default();
        let mut input = Script::new(vec![click(120.0, 80.0), click(150.0, 200.0), click(170.0, 300.0), InputEvent::Quit]);

        let outcome = run(&mut driver, &mut display, &mut input).unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved { rows: 1, .. }));
        assert!(dir.path().join("positions.csv").exists());
        assert!(dir.path().join("positions.npy").exists());
        assert_eq!(display.closed, 1);
        assert_eq!(driver.source.released, 1);
    }

    #[test]
    fn test_decode_error_keeps_recorded_samples() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::new(9, 600, 30.0).corrupt_at(4);
        let mut driver = Driver::new(source, config_in(dir.path())).unwrap();
        let mut display = FakeDisplay::default();
        let mut input = Script::new(vec![click(120.0, 80.0), click(150.0, 200.0), click(170.0, 300.0), InputEvent::Advance]);

        let result = run(&mut driver, &mut display, &mut input);
        assert!(matches!(result, Err(TrackerError::Decode(_))));

        let table = std::fs::read_to_string(dir.path().join("positions.csv")).unwrap();
        assert_eq!(table.lines().count(), 2);
        assert!(dir.path().join("positions.npy").exists());
        assert_eq!(display.closed, 1);
        assert_eq!(driver.source.released, 1);
    }

    #[test]
    fn test_decode_error_before_any_sample_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = Driver::new(FakeSource::new(9, 600, 30.0).corrupt_at(2), config_in(dir.path())).unwrap();
        let mut display = FakeDisplay::default();
        let mut input = Script::new(vec![]);

        assert!(run(&mut driver, &mut display, &mut input).is_err());
        assert!(!dir.path().join("positions.csv").exists());
    }

    #[test]
    fn test_unusable_source_fps_rejected() {
        for fps in [0.0, -25.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Driver::new(FakeSource::new(1, 4, fps), TrackerConfig::default()),
                Err(TrackerError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrackerConfig { frame_skip: 0, ..TrackerConfig::default() };
        assert!(matches!(
            Driver::new(FakeSource::new(1, 4, 30.0), config),
            Err(TrackerError::InvalidConfig(_))
        ));
    }
}
