use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::analysis::panel::Section;
use crate::data::model::{CellValue, Field};
use crate::state::AppState;

/// A filter edit made in this frame, applied after drawing.
enum FilterAction {
    Toggle(Field, CellValue),
    All(Field),
    None(Field),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let mut action = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in Field::FILTERS {
                let Some(all_values) = state.dataset.filter_values(field) else {
                    continue;
                };
                let selected = state.filters.get(&field);
                let n_selected = selected.map_or(0, |s| s.len());
                let header_text = format!("{}  ({n_selected}/{})", field.label(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field.column_name())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                action = Some(FilterAction::All(field));
                            }
                            if ui.small_button("None").clicked() {
                                action = Some(FilterAction::None(field));
                            }
                        });

                        for val in all_values {
                            let mut checked = selected.is_some_and(|s| s.contains(val));
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                action = Some(FilterAction::Toggle(field, val.clone()));
                            }
                        }
                    });
            }
        });

    match action {
        Some(FilterAction::Toggle(field, value)) => state.toggle_filter_value(field, &value),
        Some(FilterAction::All(field)) => state.select_all(field),
        Some(FilterAction::None(field)) => state.select_none(field),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, section navigation and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for section in Section::ALL {
            ui.selectable_value(&mut state.section, section, section.title());
        }

        ui.separator();

        ui.label(format!(
            "{} of {} records",
            state.snapshot.visible.len(),
            state.dataset.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open attrition data")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
