//! CrashLens - Traffic Accident Dataset Explorer
//!
//! Loads a four-table accident dataset, merges it into one immutable
//! table and serves an interactive dashboard over it.

mod charts;
mod data;
mod gui;
mod query;

use eframe::egui;
use gui::CrashLensApp;

fn main() -> eframe::Result<()> {
    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("CrashLens"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "CrashLens",
        options,
        Box::new(|cc| Ok(Box::new(CrashLensApp::new(cc)))),
    )
}
