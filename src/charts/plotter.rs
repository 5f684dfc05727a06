//! Chart Plotter Module
//! Renders the three query results as interactive egui_plot charts and
//! an egui table.

use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Plot, PlotPoints, Points};

use crate::query::{CrossTab, Distribution, SummaryRow, VarKind, Variable};

pub const ACCENT_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Creates the dashboard visualizations using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn palette_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Bar chart (categorical) or histogram (numeric) of the primary
    /// variable's distribution.
    pub fn draw_distribution_chart(ui: &mut egui::Ui, dist: &Distribution, var: Variable) {
        match dist {
            Distribution::Categorical(counts) => {
                let labels: Vec<String> = counts.iter().map(|c| c.value.clone()).collect();
                let bars: Vec<Bar> = counts
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        Bar::new(i as f64, c.count as f64)
                            .width(0.7)
                            .fill(ACCENT_COLOR.gamma_multiply(0.8))
                    })
                    .collect();

                Plot::new(format!("distribution_{}", var))
                    .height(360.0)
                    .allow_scroll(false)
                    .x_axis_label(var.label())
                    .y_axis_label("Count")
                    .x_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
                    .show(ui, |plot_ui| {
                        plot_ui.bar_chart(BarChart::new(bars).name(var.label()));
                    });
            }
            Distribution::Histogram(bins) => {
                let bars: Vec<Bar> = bins
                    .iter()
                    .map(|b| {
                        Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                            .width((b.upper - b.lower).max(f64::EPSILON))
                            .fill(ACCENT_COLOR.gamma_multiply(0.8))
                    })
                    .collect();

                Plot::new(format!("histogram_{}", var))
                    .height(360.0)
                    .allow_scroll(false)
                    .x_axis_label(var.label())
                    .y_axis_label("Count")
                    .show(ui, |plot_ui| {
                        plot_ui.bar_chart(BarChart::new(bars).name(var.label()));
                    });
            }
        }
    }

    /// Bubble chart of primary x secondary co-occurrence. Categorical
    /// pairs get a radius from their count; the numeric branch plots one
    /// bubble per merged row sized by vehicle count.
    pub fn draw_bubble_chart(
        ui: &mut egui::Ui,
        tab: &CrossTab,
        primary: Variable,
        secondary: Variable,
    ) {
        match tab {
            CrossTab::Counts(pairs) => {
                let x_labels = observed_order(pairs.iter().map(|p| p.primary.as_str()));
                let y_labels = observed_order(pairs.iter().map(|p| p.secondary.as_str()));
                let max_count = pairs.iter().map(|p| p.count).max().unwrap_or(1) as f64;

                let x_fmt = x_labels.clone();
                let y_fmt = y_labels.clone();

                Plot::new(format!("bubble_{}_{}", primary, secondary))
                    .height(360.0)
                    .allow_scroll(false)
                    .x_axis_label(primary.label())
                    .y_axis_label(secondary.label())
                    .x_axis_formatter(move |mark, _range| axis_label(&x_fmt, mark.value))
                    .y_axis_formatter(move |mark, _range| axis_label(&y_fmt, mark.value))
                    .show(ui, |plot_ui| {
                        for (i, pair) in pairs.iter().enumerate() {
                            let x = index_of(&x_labels, &pair.primary);
                            let y = index_of(&y_labels, &pair.secondary);
                            let radius = 4.0 + 16.0 * (pair.count as f64 / max_count).sqrt();

                            plot_ui.points(
                                Points::new(PlotPoints::new(vec![[x, y]]))
                                    .radius(radius as f32)
                                    .color(Self::palette_color(i).gamma_multiply(0.7))
                                    .name(format!(
                                        "{} / {}: {}",
                                        pair.primary, pair.secondary, pair.count
                                    )),
                            );
                        }
                    });
            }
            CrossTab::Sized(points) => {
                let x_labels = observed_order(points.iter().map(|p| p.primary.as_str()));
                let max_size = points
                    .iter()
                    .map(|p| p.size)
                    .fold(1.0_f64, f64::max);

                let x_fmt = x_labels.clone();

                Plot::new(format!("bubble_{}_{}", primary, secondary))
                    .height(360.0)
                    .allow_scroll(false)
                    .x_axis_label(primary.label())
                    .y_axis_label(secondary.label())
                    .x_axis_formatter(move |mark, _range| axis_label(&x_fmt, mark.value))
                    .show(ui, |plot_ui| {
                        for (i, point) in points.iter().enumerate() {
                            let x = index_of(&x_labels, &point.primary);
                            let y = point.secondary.parse::<f64>().unwrap_or(0.0);
                            let radius = 3.0 + 10.0 * (point.size / max_size).sqrt();

                            plot_ui.points(
                                Points::new(PlotPoints::new(vec![[x, y]]))
                                    .radius(radius as f32)
                                    .color(Self::palette_color(i).gamma_multiply(0.6)),
                            );
                        }
                    });
            }
        }
    }

    /// Group-by summary table: count, mean vehicle count, proportion.
    pub fn draw_summary_table(ui: &mut egui::Ui, group_var: Variable, rows: &[SummaryRow]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("summary_table_{}", group_var)))
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new(group_var.label()).strong().size(12.0));
                        ui.label(RichText::new("Count").strong().size(12.0));
                        ui.label(RichText::new("Mean Vehicles").strong().size(12.0));
                        ui.label(RichText::new("Proportion").strong().size(12.0));
                        ui.end_row();

                        for row in rows {
                            ui.label(RichText::new(&row.group).size(12.0).color(ACCENT_COLOR));
                            ui.label(RichText::new(row.count.to_string()).size(12.0));
                            match row.mean_vehicles {
                                Some(mean) => {
                                    ui.label(RichText::new(format!("{:.2}", mean)).size(12.0))
                                }
                                None => ui.label(RichText::new("-").size(12.0)),
                            };
                            ui.label(
                                RichText::new(format!("{:.1}%", row.proportion * 100.0))
                                    .size(12.0),
                            );
                            ui.end_row();
                        }
                    });
            });

        if rows.is_empty() {
            ui.add_space(8.0);
            ui.label(
                RichText::new("No rows match the current filters")
                    .size(12.0)
                    .color(Color32::GRAY),
            );
        }
    }

    /// Secondary variables render a bubble chart whatever their kind; the
    /// legend hint differs.
    pub fn bubble_hint(secondary: Variable) -> &'static str {
        match secondary.kind() {
            VarKind::Categorical => "Bubble size: co-occurrence count",
            VarKind::Numeric => "One bubble per merged row, sized by vehicle count",
        }
    }
}

/// Distinct labels in first-appearance order.
fn observed_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|existing| existing == v) {
            out.push(v.to_string());
        }
    }
    out
}

fn index_of(labels: &[String], value: &str) -> f64 {
    labels.iter().position(|l| l == value).unwrap_or(0) as f64
}

fn axis_label(labels: &[String], value: f64) -> String {
    // `as usize` saturates negatives to zero, which would repeat the
    // first label on marks left of the origin.
    if value < -0.5 {
        return String::new();
    }
    let idx = value.round() as usize;
    if (value - value.round()).abs() < 1e-6 && idx < labels.len() {
        labels[idx].clone()
    } else {
        String::new()
    }
}
