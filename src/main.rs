// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pendulum tracker
//!
//! Click the pivot and both masses of a double pendulum on sampled video
//! frames; the joint angles and positions are saved as CSV and `.npy`.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use pendulum_tracker::app::TrackerApp;
use pendulum_tracker::config::{TrackerConfig, DEFAULT_DISPLAY_WIDTH, DEFAULT_FRAME_SKIP};
use pendulum_tracker::io::media::open_source;
use pendulum_tracker::io::serialization::{SaveOutcome, DEFAULT_TABLE_NAME};
use pendulum_tracker::tracking::driver::{self, Driver};
use pendulum_tracker::ui::bridge::{ChannelDisplay, ChannelInput};
use std::path::PathBuf;
use std::sync::mpsc::channel;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video file, or a directory of frame images (asks with a file dialog when omitted)
    video: Option<PathBuf>,

    /// Width in pixels frames are scaled to for display
    #[arg(long, default_value_t = DEFAULT_DISPLAY_WIDTH)]
    display_width: u32,

    /// Keep one frame out of every N
    #[arg(long, default_value_t = DEFAULT_FRAME_SKIP)]
    frame_skip: u64,

    /// Position table; the raw array is written next to it as .npy
    #[arg(short, long, default_value = DEFAULT_TABLE_NAME)]
    output: PathBuf,

    /// Frame rate to use instead of the one the source reports
    #[arg(long)]
    fps: Option<f64>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let config = TrackerConfig {
        display_width: args.display_width,
        frame_skip: args.frame_skip,
        output: args.output,
        fps: args.fps,
    };
    config.validate()?;

    let video = match args.video {
        Some(path) => path,
        None => rfd::FileDialog::new()
            .add_filter("Videos", &["mp4", "avi", "mov", "mkv", "webm"])
            .pick_file()
            .ok_or_else(|| anyhow!("No video selected"))?,
    };

    let source = open_source(&video, config.fps)
        .with_context(|| format!("Failed to open {}", video.display()))?;
    let mut tracker = Driver::new(source, config)?;

    let (event_sender, event_receiver) = channel();
    let (update_sender, update_receiver) = channel();

    // The tracking loop blocks on input, so it gets its own thread
    let worker = std::thread::spawn(move || {
        let mut display = ChannelDisplay::new(update_sender);
        let mut input = ChannelInput::new(event_receiver);
        let outcome = driver::run(&mut tracker, &mut display, &mut input)?;
        Ok::<_, pendulum_tracker::TrackerError>((outcome, tracker.session().drain()))
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title(format!("Pendulum Tracker - {}", video.display())),
        ..Default::default()
    };

    // Dropping the app's event sender makes the tracking loop save and stop
    let ui_result = eframe::run_native(
        "Pendulum Tracker",
        options,
        Box::new(|_cc| Ok(Box::new(TrackerApp::new(event_sender, update_receiver)))),
    )
    .map_err(|e| anyhow!("Application error: {}", e));

    let (outcome, series) = worker
        .join()
        .map_err(|_| anyhow!("Tracking thread panicked"))?
        .context("Tracking failed")?;

    if let SaveOutcome::Saved { rows, .. } = outcome {
        log::info!("Total samples processed: {}", rows);
        if let Some(first) = series.first() {
            log::info!("First sample: {:?}", first.to_row());
        }
    }

    ui_result
}
