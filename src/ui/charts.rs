use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points,
};

use crate::analysis::aggregate::{ByOutcome, GroupRow, HistogramBin};
use crate::analysis::correlation::CorrelationEntry;
use crate::analysis::panel::{Panel, PanelData};
use crate::analysis::summary::BoxGroup;
use crate::color::{coolwarm, outcome_color, text_on, UNDEFINED};
use crate::dashboard::PanelResult;
use crate::data::model::{Attrition, Field};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Analysis sections (central panel)
// ---------------------------------------------------------------------------

/// Render every panel of the active section, top to bottom.
pub fn analysis_section(ui: &mut Ui, state: &AppState) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let results = state.panels.iter().zip(&state.snapshot.panels);
            for (panel, result) in results.filter(|(p, _)| p.section == state.section) {
                panel_frame(ui, panel, result);
                ui.separator();
            }
        });
}

fn panel_frame(ui: &mut Ui, panel: &Panel, result: &PanelResult) {
    ui.heading(format!("{}. {}", panel.number, panel.title));
    ui.label(panel.caption);
    ui.add_space(4.0);

    let data = match result {
        Err(e) => {
            ui.colored_label(Color32::RED, format!("⚠ Could not compute this panel: {e}"));
            return;
        }
        Ok(data) if data.is_empty() => {
            ui.weak("No records match the current filters.");
            return;
        }
        Ok(data) => data,
    };

    let id = format!("panel_{}", panel.number);
    match data {
        PanelData::Proportions { field, rows } => proportion_chart(ui, &id, *field, rows),
        PanelData::Counts { field, outcome, rows } => count_chart(ui, &id, *field, *outcome, rows),
        PanelData::OutcomeHistogram { field, rows } => grouped_histogram(ui, &id, *field, rows),
        PanelData::BinnedHistogram { field, bins } => binned_histogram(ui, &id, *field, bins),
        PanelData::Means { group, value, rows } => mean_chart(ui, &id, *group, *value, rows),
        PanelData::Boxes { value, across, groups } => box_chart(ui, &id, *value, *across, groups),
        PanelData::Correlations(entries) => correlation_heatmap(ui, entries),
    }
}

// ---------------------------------------------------------------------------
// Plot helpers
// ---------------------------------------------------------------------------

/// Axis labels for categories drawn at x = 0, 1, 2, …
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

fn labels_of<T>(rows: &[GroupRow<T>]) -> Vec<String> {
    rows.iter().map(|r| r.group.to_string()).collect()
}

fn base_plot(id: &str, x_label: &str, y_label: &str) -> Plot<'static> {
    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label(x_label.to_string())
        .y_axis_label(y_label.to_string())
        .allow_scroll(false)
        .allow_drag(false)
}

fn outcome_chart(outcome: Attrition, bars: Vec<Bar>) -> BarChart {
    BarChart::new(bars)
        .name(outcome.label())
        .color(outcome_color(outcome))
}

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

/// Stacked percentage bars, one stack per group.
fn proportion_chart(ui: &mut Ui, id: &str, field: Field, rows: &[GroupRow<ByOutcome<f64>>]) {
    fn bars(rows: &[GroupRow<ByOutcome<f64>>], outcome: Attrition) -> Vec<Bar> {
        rows.iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(i as f64, *r.value.get(outcome))
                    .width(0.6)
                    .name(format!("{}: {:.1}%", r.group, r.value.get(outcome)))
            })
            .collect()
    }
    let no = outcome_chart(Attrition::No, bars(rows, Attrition::No));
    let yes = outcome_chart(Attrition::Yes, bars(rows, Attrition::Yes)).stack_on(&[&no]);

    base_plot(id, field.label(), "Attrition (%)")
        .x_axis_formatter(category_axis(labels_of(rows)))
        .include_y(100.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(no);
            plot_ui.bar_chart(yes);
        });
}

fn count_chart(ui: &mut Ui, id: &str, field: Field, outcome: Attrition, rows: &[GroupRow<usize>]) {
    let chart = outcome_chart(
        outcome,
        rows.iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(i as f64, r.value as f64)
                    .width(0.6)
                    .name(format!("{}: {}", r.group, r.value))
            })
            .collect(),
    );
    base_plot(id, field.label(), "Attritions")
        .x_axis_formatter(category_axis(labels_of(rows)))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Side-by-side bars per category, one per outcome.
fn grouped_histogram(ui: &mut Ui, id: &str, field: Field, rows: &[GroupRow<ByOutcome<usize>>]) {
    let charts: Vec<BarChart> = Attrition::ALL
        .iter()
        .enumerate()
        .map(|(k, &outcome)| {
            let offset = if k == 0 { -0.2 } else { 0.2 };
            outcome_chart(
                outcome,
                rows.iter()
                    .enumerate()
                    .map(|(i, r)| {
                        Bar::new(i as f64 + offset, *r.value.get(outcome) as f64)
                            .width(0.4)
                            .name(format!("{} / {}: {}", r.group, outcome, r.value.get(outcome)))
                    })
                    .collect(),
            )
        })
        .collect();

    base_plot(id, field.label(), "count")
        .x_axis_formatter(category_axis(labels_of(rows)))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Numeric bins stacked by outcome, drawn at their real x positions.
fn binned_histogram(ui: &mut Ui, id: &str, field: Field, bins: &[HistogramBin]) {
    fn bars(bins: &[HistogramBin], outcome: Attrition) -> Vec<Bar> {
        bins.iter()
            .map(|b| {
                let width = if b.end > b.start { b.end - b.start } else { 1.0 };
                Bar::new((b.start + b.end) / 2.0, *b.counts.get(outcome) as f64)
                    .width(width)
                    .name(format!("{:.0}–{:.0}: {}", b.start, b.end, b.counts.get(outcome)))
            })
            .collect()
    }
    let no = outcome_chart(Attrition::No, bars(bins, Attrition::No));
    let yes = outcome_chart(Attrition::Yes, bars(bins, Attrition::Yes)).stack_on(&[&no]);

    base_plot(id, field.label(), "count").show(ui, |plot_ui| {
        plot_ui.bar_chart(no);
        plot_ui.bar_chart(yes);
    });
}

fn mean_chart(ui: &mut Ui, id: &str, group: Field, value: Field, rows: &[GroupRow<f64>]) {
    let chart = BarChart::new(
        rows.iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(i as f64, r.value)
                    .width(0.6)
                    .name(format!("{}: {:.1}", r.group, r.value))
            })
            .collect(),
    )
    .name(format!("Mean {}", value.label()))
    .color(Color32::from_rgb(0x1f, 0x77, 0xb4));

    base_plot(id, group.label(), value.label())
        .x_axis_formatter(category_axis(labels_of(rows)))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// One box per (category, outcome); outliers drawn as points.
fn box_chart(ui: &mut Ui, id: &str, value: Field, across: Option<Field>, groups: &[BoxGroup]) {
    let mut categories: Vec<String> = Vec::new();
    for g in groups {
        let label = g
            .category
            .as_ref()
            .map_or_else(|| "All".to_string(), |c| c.to_string());
        if categories.last() != Some(&label) {
            categories.push(label);
        }
    }

    let mut plots = Vec::new();
    let mut outliers = Vec::new();
    for outcome in Attrition::ALL {
        let side = if outcome == Attrition::No { 0.0 } else { 1.0 };
        let mut elems = Vec::new();
        let mut points = Vec::new();
        for g in groups.iter().filter(|g| g.outcome == outcome) {
            let label = g
                .category
                .as_ref()
                .map_or_else(|| "All".to_string(), |c| c.to_string());
            // Without a crossing field the outcomes themselves are the categories.
            let x = match across {
                None => side,
                Some(_) => {
                    let slot = categories.iter().position(|c| *c == label).unwrap_or(0);
                    slot as f64 - 0.2 + 0.4 * side
                }
            };
            let s = &g.summary;
            elems.push(
                BoxElem::new(
                    x,
                    BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                )
                .box_width(0.35)
                .name(format!("{label} / {outcome} (n={})", s.count)),
            );
            points.extend(s.outliers.iter().map(|&v| [x, v]));
        }
        plots.push(
            BoxPlot::new(elems)
                .name(outcome.label())
                .color(outcome_color(outcome)),
        );
        outliers.push(
            Points::new(PlotPoints::from(points))
                .radius(2.0)
                .color(outcome_color(outcome)),
        );
    }

    let (x_label, labels) = match across {
        Some(field) => (field.label(), categories),
        None => (
            Field::Attrition.label(),
            Attrition::ALL.iter().map(|o| o.label().to_string()).collect(),
        ),
    };

    base_plot(id, x_label, value.label())
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            for bp in plots {
                plot_ui.box_plot(bp);
            }
            for pts in outliers {
                plot_ui.points(pts);
            }
        });
}

/// Single-column annotated heatmap of correlations with Attrition.
fn correlation_heatmap(ui: &mut Ui, entries: &[CorrelationEntry]) {
    let cell = egui::vec2(140.0, 24.0);
    egui::Grid::new("correlation_heatmap")
        .spacing([8.0, 2.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            ui.strong(Field::Attrition.column_name());
            ui.end_row();

            for entry in entries {
                ui.label(&entry.column);
                let (rect, response) = ui.allocate_exact_size(cell, Sense::hover());
                let fill = entry.correlation.value().map_or(UNDEFINED, coolwarm);
                ui.painter().rect_filled(rect, 0.0, fill);
                ui.painter().text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    entry.correlation.to_string(),
                    FontId::proportional(13.0),
                    text_on(fill),
                );
                response.on_hover_text(format!(
                    "{} vs Attrition: {}",
                    entry.column, entry.correlation
                ));
                ui.end_row();
            }
        });
}
