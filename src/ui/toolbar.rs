// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the frame controls.
//!
//! The buttons mirror the keyboard shortcuts: SPACE for the next frame,
//! `s` to save and `q` to quit.

use crate::tracking::driver::{InputEvent, Status};

/// Display the toolbar; returns the event of a pressed button.
pub fn show(ui: &mut egui::Ui, status: Option<&Status>, finished: bool) -> Option<InputEvent> {
    let mut event = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.add_enabled_ui(!finished, |ui| {
            if ui.button("⏭ Next frame (Space)").clicked() {
                event = Some(InputEvent::Advance);
            }
            if ui.button("💾 Save (S)").clicked() {
                event = Some(InputEvent::Save);
            }
            if ui.button("✖ Quit (Q)").clicked() {
                event = Some(InputEvent::Quit);
            }
        });

        ui.separator();

        let text = match (finished, status) {
            (true, _) => "Run finished".to_string(),
            (false, Some(status)) => format!(
                "Frame {} | t = {:.3}s | next: {}",
                status.raw_index,
                status.elapsed,
                status.next.label()
            ),
            (false, None) => "Loading video...".to_string(),
        };
        ui.label(egui::RichText::new(text).italics().weak());
    });

    event
}
