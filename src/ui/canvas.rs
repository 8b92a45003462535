// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for frame display and landmark clicks.
//!
//! The frame is painted at the display scale chosen by the tracking loop, so
//! one canvas pixel is one display pixel and clicks are reported relative to
//! the frame's top-left corner.

use crate::models::landmark::DisplayPoint;
use crate::tracking::cycle::Marker;
use crate::tracking::driver::Status;

const MARKER_RADIUS: f32 = 5.0;
const MARKER_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 0);
const PROMPT_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 0, 0);
const TIME_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 0, 255);

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    Click(DisplayPoint),
}

/// Frame currently on screen.
pub struct FrameView {
    pub texture: egui::TextureHandle,
    /// Source frame size in pixels
    pub size: (u32, u32),
    pub scale: f64,
}

impl FrameView {
    /// Size of the frame once scaled for display.
    pub fn display_size(&self) -> egui::Vec2 {
        egui::vec2(
            (self.size.0 as f64 * self.scale) as f32,
            (self.size.1 as f64 * self.scale) as f32,
        )
    }
}

/// Display the frame with its overlay and report clicks on it.
pub fn show(
    ui: &mut egui::Ui,
    view: Option<&FrameView>,
    markers: &[Marker],
    status: Option<&Status>,
) -> CanvasAction {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let Some(view) = view else {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("Waiting for the first frame...")
                    .size(16.0)
                    .color(egui::Color32::from_gray(200)),
            );
        });
        return CanvasAction::None;
    };

    egui::ScrollArea::both()
        .show(ui, |ui| {
            let (rect, response) = ui.allocate_exact_size(view.display_size(), egui::Sense::click());

            let painter = ui.painter_at(rect);
            painter.image(
                view.texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            if let Some(status) = status {
                draw_status(&painter, rect, status);
            }
            for marker in markers {
                draw_marker(&painter, rect, marker);
            }

            let mut action = CanvasAction::None;
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    if rect.contains(pos) {
                        let offset = pos - rect.min;
                        action = CanvasAction::Click(DisplayPoint::new(offset.x as f64, offset.y as f64));
                    }
                }
            }
            action
        })
        .inner
}

fn draw_status(painter: &egui::Painter, rect: egui::Rect, status: &Status) {
    let font = egui::FontId::proportional(18.0);
    painter.text(
        rect.min + egui::vec2(10.0, 30.0),
        egui::Align2::LEFT_BOTTOM,
        format!("Click: {}", status.next.label()),
        font.clone(),
        PROMPT_COLOR,
    );
    painter.text(
        rect.min + egui::vec2(10.0, 60.0),
        egui::Align2::LEFT_BOTTOM,
        format!("t = {:.3}s", status.elapsed),
        font,
        TIME_COLOR,
    );
}

fn draw_marker(painter: &egui::Painter, rect: egui::Rect, marker: &Marker) {
    let center = rect.min + egui::vec2(marker.at.x as f32, marker.at.y as f32);
    painter.circle_filled(center, MARKER_RADIUS, MARKER_COLOR);
    painter.text(
        center + egui::vec2(10.0, -10.0),
        egui::Align2::LEFT_BOTTOM,
        marker.landmark.label(),
        egui::FontId::proportional(14.0),
        MARKER_COLOR,
    );
}
