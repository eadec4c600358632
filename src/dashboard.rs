use crate::analysis::panel::{Panel, PanelData};
use crate::data::filter::{apply_filters, table_order, FilterSelection, TableSort};
use crate::data::model::Dataset;
use crate::error::PanelError;

pub type PanelResult = Result<PanelData, PanelError>;

// ---------------------------------------------------------------------------
// One filter change in, one fully computed page out
// ---------------------------------------------------------------------------

/// Everything the UI draws for one [`FilterSelection`].
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    /// Dataset row indices that passed the filters, ascending.
    pub visible: Vec<usize>,
    /// Same rows in data-table order.
    pub table_rows: Vec<usize>,
    /// One result per panel, index-aligned with the panel list.
    pub panels: Vec<PanelResult>,
}

/// Filter Stage, then every panel in order, then the table ordering.
pub fn render(
    dataset: &Dataset,
    panels: &[Panel],
    selection: &FilterSelection,
    sort: Option<TableSort>,
) -> DashboardSnapshot {
    let view = apply_filters(dataset, selection);
    log::debug!("Filter matched {} of {} records", view.len(), dataset.len());

    let results = panels
        .iter()
        .map(|panel| {
            let result = panel.compute(&view);
            if let Err(e) = &result {
                log::warn!("Panel {} ({}) failed: {e}", panel.number, panel.title);
            }
            result
        })
        .collect();

    DashboardSnapshot {
        visible: view.indices().to_vec(),
        table_rows: table_order(&view, sort),
        panels: results,
    }
}
