// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main window state and egui App implementation.
//!
//! The window is the display surface and input source of the tracking loop,
//! which runs on its own thread. Each UI frame drains the drawing updates the
//! loop has sent and forwards clicks, key presses and button presses back to
//! it as [`InputEvent`]s.

use crate::models::landmark::Point;
use crate::models::sample::Sample;
use crate::tracking::cycle::Marker;
use crate::tracking::driver::{InputEvent, Status};
use crate::ui::bridge::SurfaceUpdate;
use crate::ui::canvas::{self, FrameView};
use crate::ui::{properties, toolbar};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Duration;

/// How often the window polls the tracking thread for updates.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main window state.
pub struct TrackerApp {
    /// Events for the tracking thread
    events: Sender<InputEvent>,

    /// Drawing updates from the tracking thread
    updates: Receiver<SurfaceUpdate>,

    /// Frame currently on screen
    frame: Option<FrameView>,

    /// Markers placed on the current frame
    markers: Vec<Marker>,

    /// Overlay state of the current frame
    status: Option<Status>,

    /// Samples recorded so far, for the side panel
    samples: Vec<Sample>,

    /// Set once the tracking loop has saved and stopped
    finished: bool,
}

impl TrackerApp {
    pub fn new(events: Sender<InputEvent>, updates: Receiver<SurfaceUpdate>) -> Self {
        Self {
            events,
            updates,
            frame: None,
            markers: Vec::new(),
            status: None,
            samples: Vec::new(),
            finished: false,
        }
    }

    fn send(&self, event: InputEvent) {
        if self.finished {
            return;
        }
        if self.events.send(event).is_err() {
            log::warn!("Tracking loop has stopped, ignoring {:?}", event);
        }
    }

    fn anchor(&self) -> Option<Point> {
        self.status.and_then(|status| status.anchor)
    }

    /// Apply everything the tracking thread has sent since the last frame.
    fn drain_updates(&mut self, ctx: &egui::Context) {
        loop {
            match self.updates.try_recv() {
                Ok(SurfaceUpdate::Frame { frame, scale }) => {
                    let size = [frame.frame.width() as usize, frame.frame.height() as usize];
                    let color_image = egui::ColorImage::from_rgb(size, frame.frame.image.as_raw());
                    let texture = ctx.load_texture("frame", color_image, egui::TextureOptions::LINEAR);

                    self.frame = Some(FrameView {
                        texture,
                        size: (frame.frame.width(), frame.frame.height()),
                        scale,
                    });
                    self.markers.clear();
                }
                Ok(SurfaceUpdate::Status(status)) => self.status = Some(status),
                Ok(SurfaceUpdate::Marker(marker)) => self.markers.push(marker),
                Ok(SurfaceUpdate::Sample(sample)) => self.samples.push(sample),
                Ok(SurfaceUpdate::Closed) | Err(TryRecvError::Disconnected) => {
                    if !self.finished {
                        log::info!("Tracking finished, closing window");
                        self.finished = true;
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }
    }

    fn key_event(ctx: &egui::Context) -> Option<InputEvent> {
        if ctx.wants_keyboard_input() {
            return None;
        }
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Space) {
                Some(InputEvent::Advance)
            } else if i.key_pressed(egui::Key::S) {
                Some(InputEvent::Save)
            } else if i.key_pressed(egui::Key::Q) {
                Some(InputEvent::Quit)
            } else if i.events.iter().any(|e| matches!(e, egui::Event::Key { pressed: true, .. })) {
                Some(InputEvent::Ignored)
            } else {
                None
            }
        })
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_updates(ctx);

        // Closing the window counts as quit; keep it open until the series is written
        if ctx.input(|i| i.viewport().close_requested()) && !self.finished {
            self.send(InputEvent::Quit);
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }

        let toolbar_event = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, self.status.as_ref(), self.finished))
            .inner;
        if let Some(event) = toolbar_event {
            self.send(event);
        }

        egui::SidePanel::right("samples")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, &self.samples, self.anchor()));

        if let Some(event) = Self::key_event(ctx) {
            self.send(event);
        }

        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                canvas::show(ui, self.frame.as_ref(), &self.markers, self.status.as_ref())
            })
            .inner;

        match canvas_action {
            canvas::CanvasAction::Click(at) => {
                log::debug!("Click at ({:.1}, {:.1})", at.x, at.y);
                self.send(InputEvent::Click(at));
            }
            canvas::CanvasAction::None => {}
        }

        if !self.finished {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
