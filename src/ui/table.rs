use eframe::egui::{RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Data table (central panel, "Data Table" section)
// ---------------------------------------------------------------------------

/// The filtered records, every column, sortable by header click.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Complete Filtered Data Table");
    ui.label(
        RichText::new(format!(
            "Total Records after Filter: {}",
            state.snapshot.visible.len()
        ))
        .strong(),
    );
    ui.separator();

    let mut clicked = None;
    {
        let columns = state.dataset.schema().columns();
        let rows = &state.snapshot.table_rows;
        let sort = state.table_sort;
        let dataset = &state.dataset;

        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .columns(Column::auto().at_least(60.0), columns.len())
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for (i, col) in columns.iter().enumerate() {
                        header.col(|ui: &mut Ui| {
                            let marker = match sort {
                                Some(s) if s.column == i && s.ascending => " ⏶",
                                Some(s) if s.column == i => " ⏷",
                                _ => "",
                            };
                            if ui.button(format!("{}{marker}", col.name)).clicked() {
                                clicked = Some(i);
                            }
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let record = dataset.record(rows[row.index()]);
                        for cell in record.cells() {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                });
        });
    }

    if let Some(column) = clicked {
        state.sort_by_column(column);
    }
}
