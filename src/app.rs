use eframe::egui;

use crate::analysis::panel::Section;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AttritionDashboardApp {
    pub state: AppState,
}

impl AttritionDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AttritionDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + section navigation ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active section ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("🔍 HR Analytics Dashboard – Employee Attrition Insights");
            ui.label(
                "Macro and micro-level insights into employee attrition trends. \
                 Use the filters and sections to explore the data through visualizations.",
            );
            ui.weak(format!("Source: {}", self.state.source.display()));
            ui.separator();

            match self.state.section {
                Section::Table => table::data_table(ui, &mut self.state),
                Section::Macro | Section::Micro => charts::analysis_section(ui, &self.state),
            }
        });
    }
}
