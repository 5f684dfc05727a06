//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::CrashLensApp;
pub use chart_viewer::{ChartViewer, ViewResults, ViewTab};
pub use control_panel::{ControlPanel, ControlPanelAction, Selections};
