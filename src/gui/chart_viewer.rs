//! Chart Viewer Widget
//! Central panel switching between the three dashboard views:
//! distribution chart, cross-tab bubble chart and summary table.

use egui::{Color32, RichText, ScrollArea};

use crate::charts::ChartPlotter;
use crate::query::{CrossTab, Distribution, SummaryRow, Variable};

/// The three dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTab {
    Distribution,
    CrossTab,
    Summary,
}

impl ViewTab {
    pub const ALL: [ViewTab; 3] = [ViewTab::Distribution, ViewTab::CrossTab, ViewTab::Summary];

    pub fn title(&self) -> &'static str {
        match self {
            ViewTab::Distribution => "📊 Distribution",
            ViewTab::CrossTab => "🫧 Bubble Chart",
            ViewTab::Summary => "📋 Summary",
        }
    }
}

/// The three query results for the current selections, recomputed as a
/// unit whenever a selection changes.
pub struct ViewResults {
    pub primary: Variable,
    pub secondary: Variable,
    pub summary_var: Variable,
    pub distribution: Distribution,
    pub cross_tab: CrossTab,
    pub summary: Vec<SummaryRow>,
}

/// Central display area.
pub struct ChartViewer {
    pub tab: ViewTab,
    pub results: Option<ViewResults>,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            tab: ViewTab::Distribution,
            results: None,
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.results = None;
    }

    pub fn set_results(&mut self, results: ViewResults) {
        self.results = Some(results);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.results.is_none() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ui.horizontal(|ui| {
            for tab in ViewTab::ALL {
                if ui
                    .selectable_label(self.tab == tab, RichText::new(tab.title()).size(14.0))
                    .clicked()
                {
                    self.tab = tab;
                }
            }
        });
        ui.separator();
        ui.add_space(8.0);

        let Some(results) = &self.results else {
            return;
        };
        let active_tab = self.tab;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match active_tab {
                ViewTab::Distribution => {
                    ui.label(
                        RichText::new(format!("Distribution of {}", results.primary.label()))
                            .size(16.0)
                            .strong(),
                    );
                    ui.add_space(6.0);
                    ChartPlotter::draw_distribution_chart(
                        ui,
                        &results.distribution,
                        results.primary,
                    );
                }
                ViewTab::CrossTab => {
                    ui.label(
                        RichText::new(format!(
                            "{} x {}",
                            results.primary.label(),
                            results.secondary.label()
                        ))
                        .size(16.0)
                        .strong(),
                    );
                    ui.label(
                        RichText::new(ChartPlotter::bubble_hint(results.secondary))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                    ui.add_space(6.0);
                    ChartPlotter::draw_bubble_chart(
                        ui,
                        &results.cross_tab,
                        results.primary,
                        results.secondary,
                    );
                }
                ViewTab::Summary => {
                    ui.label(
                        RichText::new(format!("Summary by {}", results.summary_var.label()))
                            .size(16.0)
                            .strong(),
                    );
                    ui.add_space(6.0);
                    ChartPlotter::draw_summary_table(ui, results.summary_var, &results.summary);
                }
            });
    }
}
