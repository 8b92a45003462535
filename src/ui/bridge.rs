// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Channel bridge between the tracking thread and the egui window.
//!
//! The tracking loop blocks on [`ChannelInput`] for the next operator event
//! and publishes what it wants drawn through [`ChannelDisplay`]. The window
//! drains those updates once per UI frame.

use crate::error::Result;
use crate::models::sample::Sample;
use crate::tracking::cycle::Marker;
use crate::tracking::driver::{DisplaySurface, InputEvent, InputSource, SampledFrame, Status};
use std::sync::mpsc::{Receiver, Sender};

/// Drawing requests sent to the window.
#[derive(Debug, Clone)]
pub enum SurfaceUpdate {
    Frame { frame: SampledFrame, scale: f64 },
    Status(Status),
    Marker(Marker),
    Sample(Sample),
    /// The run is over; the window may close.
    Closed,
}

/// [`DisplaySurface`] that forwards everything to the window thread.
pub struct ChannelDisplay {
    updates: Sender<SurfaceUpdate>,
}

impl ChannelDisplay {
    pub fn new(updates: Sender<SurfaceUpdate>) -> Self {
        Self { updates }
    }

    fn send(&self, update: SurfaceUpdate) {
        // The window may already be gone; the run still has to finish and save.
        if self.updates.send(update).is_err() {
            log::debug!("Window closed, dropping display update");
        }
    }
}

impl DisplaySurface for ChannelDisplay {
    fn show_frame(&mut self, frame: &SampledFrame, scale: f64) -> Result<()> {
        self.send(SurfaceUpdate::Frame {
            frame: frame.clone(),
            scale,
        });
        Ok(())
    }

    fn show_status(&mut self, status: &Status) -> Result<()> {
        self.send(SurfaceUpdate::Status(*status));
        Ok(())
    }

    fn draw_marker(&mut self, marker: &Marker) -> Result<()> {
        self.send(SurfaceUpdate::Marker(*marker));
        Ok(())
    }

    fn sample_recorded(&mut self, sample: &Sample) {
        self.send(SurfaceUpdate::Sample(*sample));
    }

    fn close(&mut self) {
        self.send(SurfaceUpdate::Closed);
    }
}

/// [`InputSource`] fed by the window thread.
pub struct ChannelInput {
    events: Receiver<InputEvent>,
}

impl ChannelInput {
    pub fn new(events: Receiver<InputEvent>) -> Self {
        Self { events }
    }
}

impl InputSource for ChannelInput {
    fn next_event(&mut self) -> InputEvent {
        // A dropped sender means the window is gone: treat it as quit so the
        // series is still written.
        self.events.recv().unwrap_or(InputEvent::Quit)
    }
}
