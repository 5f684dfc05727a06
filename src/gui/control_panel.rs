//! Control Panel Widget
//! Left side panel with the data source picker, variable selectors,
//! value filters and progress display.

use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::path::PathBuf;

use crate::query::{Role, Variable};

/// Current dashboard selections. `Default` is also the reset target:
/// primary = Month, secondary = Number_of_Vehicles, no filters.
#[derive(Clone)]
pub struct Selections {
    pub data_dir: Option<PathBuf>,
    pub primary: Variable,
    pub secondary: Variable,
    pub summary_var: Variable,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            data_dir: None,
            primary: Variable::Month,
            secondary: Variable::NumberOfVehicles,
            summary_var: Variable::Month,
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub selections: Selections,
    pub filter_options: Vec<String>,
    pub selected_filters: Vec<bool>,
    pub progress: f32,
    pub status: String,
    pub data_ready: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selections: Selections::default(),
            filter_options: Vec::new(),
            selected_filters: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            data_ready: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter checkbox list (follows the primary variable).
    pub fn update_filter_options(&mut self, options: Vec<String>) {
        self.selected_filters = vec![false; options.len()];
        self.filter_options = options;
    }

    /// Currently checked filter values; empty means no filtering.
    pub fn active_filters(&self) -> Vec<String> {
        self.filter_options
            .iter()
            .zip(self.selected_filters.iter())
            .filter(|(_, &selected)| selected)
            .map(|(value, _)| value.clone())
            .collect()
    }

    /// Restore default selections. Data directory and loaded data are kept;
    /// this is purely a UI-state operation.
    pub fn reset(&mut self) {
        let data_dir = self.selections.data_dir.clone();
        self.selections = Selections {
            data_dir,
            ..Selections::default()
        };
        self.selected_filters = vec![false; self.filter_options.len()];
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚗 CrashLens")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Traffic Accident Explorer")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .selections
                        .data_dir
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No folder selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.selections.data_dir.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseData;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Variable Section =====
        ui.label(RichText::new("🔧 Variables").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 150.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Primary:"));
            ComboBox::from_id_salt("primary_var")
                .width(combo_width)
                .selected_text(self.selections.primary.label())
                .show_ui(ui, |ui| {
                    for var in Variable::choices(Role::Primary) {
                        if ui
                            .selectable_label(self.selections.primary == *var, var.label())
                            .clicked()
                            && self.selections.primary != *var
                        {
                            self.selections.primary = *var;
                            action = ControlPanelAction::PrimaryChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Secondary:"));
            ComboBox::from_id_salt("secondary_var")
                .width(combo_width)
                .selected_text(self.selections.secondary.label())
                .show_ui(ui, |ui| {
                    for var in Variable::choices(Role::Secondary) {
                        if ui
                            .selectable_label(self.selections.secondary == *var, var.label())
                            .clicked()
                            && self.selections.secondary != *var
                        {
                            self.selections.secondary = *var;
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Summarize by:"));
            ComboBox::from_id_salt("summary_var")
                .width(combo_width)
                .selected_text(self.selections.summary_var.label())
                .show_ui(ui, |ui| {
                    for var in Variable::choices(Role::Summary) {
                        if ui
                            .selectable_label(self.selections.summary_var == *var, var.label())
                            .clicked()
                            && self.selections.summary_var != *var
                        {
                            self.selections.summary_var = *var;
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(
            RichText::new(format!("🔍 Filter {}", self.selections.primary.label()))
                .size(14.0)
                .strong(),
        );
        ui.add_space(5.0);

        if !self.data_ready || self.filter_options.is_empty() {
            ui.label(
                RichText::new("Load a dataset to enable filters")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        } else {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("filter_values")
                        .max_height(160.0)
                        .show(ui, |ui| {
                            for (i, value) in self.filter_options.iter().enumerate() {
                                if i < self.selected_filters.len()
                                    && ui
                                        .checkbox(&mut self.selected_filters[i], value)
                                        .changed()
                                {
                                    action = ControlPanelAction::SelectionChanged;
                                }
                            }
                        });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Clear All").clicked() {
                    self.selected_filters.iter_mut().for_each(|v| *v = false);
                    action = ControlPanelAction::SelectionChanged;
                }
                if ui.small_button("↺ Reset").clicked() {
                    action = ControlPanelAction::Reset;
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("rows") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseData,
    PrimaryChanged,
    SelectionChanged,
    Reset,
}
