// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Append-only store for the samples of one run.

use crate::models::sample::{Sample, Series};

#[derive(Debug, Default)]
pub struct SessionRecorder {
    series: Series,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a completed sample to the end of the series.
    pub fn append(&mut self, sample: Sample) {
        self.series.push(sample);
        log::debug!("Recorded sample {} at t={:.3}s", self.series.len(), sample.elapsed);
    }

    /// The full series so far. The recorder keeps its copy.
    pub fn drain(&self) -> Series {
        self.series.clone()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::landmark::Point;

    fn sample_at(t: f64) -> Sample {
        let p = Point::new(t, t);
        Sample::new(t, p, p, p, 0.0, 0.0)
    }

    #[test]
    fn test_append_keeps_order() {
        let mut recorder = SessionRecorder::new();
        assert!(recorder.is_empty());
        for i in 1..=4 {
            recorder.append(sample_at(i as f64));
        }
        assert_eq!(recorder.len(), 4);
        let times: Vec<f64> = recorder.samples().iter().map(|s| s.elapsed).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_drain_does_not_clear() {
        let mut recorder = SessionRecorder::new();
        recorder.append(sample_at(1.0));
        recorder.append(sample_at(2.0));
        let first = recorder.drain();
        let second = recorder.drain();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(recorder.len(), 2);
    }
}
