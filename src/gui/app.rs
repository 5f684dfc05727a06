//! CrashLens Main Application
//! Main window wiring the control panel to the aggregation engine and
//! chart viewer. Dataset construction runs on a background thread.

use anyhow::Context;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::data::build_dataset;
use crate::gui::chart_viewer::{ChartViewer, ViewResults};
use crate::gui::control_panel::{ControlPanel, ControlPanelAction};
use crate::query::AggregationEngine;

/// Pipeline stages reported during loading, used to scale the progress bar.
const PIPELINE_STAGES: f32 = 7.0;

/// Dataset build result from the background thread
enum LoadResult {
    Progress(f32, String),
    Complete(AggregationEngine),
    Error(String),
}

/// Main application window.
pub struct CrashLensApp {
    engine: Option<Arc<AggregationEngine>>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl CrashLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            engine: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        }
    }

    /// Handle data folder selection and start the pipeline in a thread.
    fn handle_browse_data(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            self.chart_viewer.clear();
            self.engine = None;
            self.control_panel.data_ready = false;
            self.control_panel.update_filter_options(Vec::new());
            self.control_panel.selections.data_dir = Some(dir.clone());
            self.control_panel.set_progress(0.0, "Loading dataset...");
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            thread::spawn(move || Self::run_pipeline(tx, dir));
        }
    }

    /// Build the merged dataset (called from the background thread).
    fn run_pipeline(tx: Sender<LoadResult>, dir: PathBuf) {
        let mut stage_no = 0u32;
        let result = build_dataset(&dir, |stage| {
            stage_no += 1;
            let pct = 90.0 * stage_no as f32 / PIPELINE_STAGES;
            let _ = tx.send(LoadResult::Progress(pct, stage.describe()));
        })
        .with_context(|| format!("building dataset from {}", dir.display()));

        match result {
            Ok(merged) => {
                let _ = tx.send(LoadResult::Complete(AggregationEngine::new(merged)));
            }
            Err(e) => {
                let _ = tx.send(LoadResult::Error(format!("{e:#}")));
            }
        }
    }

    /// Check for dataset build results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete(engine) => {
                        let engine = Arc::new(engine);
                        let options =
                            engine.filter_options(self.control_panel.selections.primary);
                        self.control_panel.update_filter_options(options);
                        self.control_panel.data_ready = true;
                        self.control_panel.set_progress(
                            100.0,
                            &format!("Loaded {} merged rows", engine.row_count()),
                        );
                        self.engine = Some(engine);
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.recompute_views();
                    }
                    LoadResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Primary variable changed: refresh the filter list, then recompute.
    fn handle_primary_changed(&mut self) {
        if let Some(engine) = &self.engine {
            let options = engine.filter_options(self.control_panel.selections.primary);
            self.control_panel.update_filter_options(options);
        }
        self.recompute_views();
    }

    /// Run the three queries for the current selections. The engine is an
    /// immutable shared value, so the queries run in parallel.
    fn recompute_views(&mut self) {
        let Some(engine) = self.engine.clone() else {
            return;
        };

        let selections = self.control_panel.selections.clone();
        let filters = self.control_panel.active_filters();

        let (distribution, (cross_tab, summary)) = rayon::join(
            || engine.distribution(selections.primary, &filters),
            || {
                rayon::join(
                    || engine.cross_tab(selections.primary, selections.secondary, &filters),
                    || engine.summary(selections.summary_var, selections.primary, &filters),
                )
            },
        );

        match (distribution, cross_tab, summary) {
            (Ok(distribution), Ok(cross_tab), Ok(summary)) => {
                self.chart_viewer.set_results(ViewResults {
                    primary: selections.primary,
                    secondary: selections.secondary,
                    summary_var: selections.summary_var,
                    distribution,
                    cross_tab,
                    summary,
                });
            }
            (d, c, s) => {
                let error = [
                    d.err().map(|e| e.to_string()),
                    c.err().map(|e| e.to_string()),
                    s.err().map(|e| e.to_string()),
                ]
                .into_iter()
                .flatten()
                .next()
                .unwrap_or_default();
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", error));
            }
        }
    }
}

impl eframe::App for CrashLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseData => self.handle_browse_data(),
                        ControlPanelAction::PrimaryChanged => self.handle_primary_changed(),
                        ControlPanelAction::SelectionChanged => self.recompute_views(),
                        ControlPanelAction::Reset => {
                            self.control_panel.reset();
                            self.handle_primary_changed();
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
