// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sample list panel.
//!
//! Shows the anchored pivot and the samples recorded so far, newest last.

use crate::models::landmark::Point;
use crate::models::sample::Sample;

pub fn show(ui: &mut egui::Ui, samples: &[Sample], anchor: Option<Point>) {
    ui.heading("Samples");
    ui.separator();

    match anchor {
        Some(pivot) => ui.label(format!("Pivot: ({:.1}, {:.1})", pivot.x, pivot.y)),
        None => ui.label(egui::RichText::new("Pivot not set").weak()),
    };
    ui.label(format!("Recorded: {}", samples.len()));
    ui.separator();

    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .show(ui, |ui| {
            egui::Grid::new("samples_grid").striped(true).show(ui, |ui| {
                ui.strong("#");
                ui.strong("t (s)");
                ui.strong("t1 (rad)");
                ui.strong("t2 (rad)");
                ui.end_row();

                for (i, sample) in samples.iter().enumerate() {
                    ui.label(format!("{}", i + 1));
                    ui.label(format!("{:.3}", sample.elapsed));
                    ui.label(format!("{:.3}", sample.angle1));
                    ui.label(format!("{:.3}", sample.angle2));
                    ui.end_row();
                }
            });
        });
}
