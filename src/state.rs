use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::analysis::panel::{dashboard_panels, Panel, Section};
use crate::config::DashboardConfig;
use crate::dashboard::{self, DashboardSnapshot};
use crate::data::filter::{init_filter_selection, FilterSelection, TableSort};
use crate::data::loader;
use crate::data::model::{CellValue, Dataset, Field, SchemaMode};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset; immutable until another file is opened.
    pub dataset: Dataset,

    /// Where `dataset` came from.
    pub source: PathBuf,

    /// Schema mode used for files opened at runtime.
    pub schema_mode: SchemaMode,

    /// Panel descriptors in page order.
    pub panels: Vec<Panel>,

    /// Per-field filter selections.
    pub filters: FilterSelection,

    /// Page computed for the current filters (cached until they change).
    pub snapshot: DashboardSnapshot,

    /// Active navigation section.
    pub section: Section,

    /// Data-table sort column, if any.
    pub table_sort: Option<TableSort>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Dataset, source: PathBuf, config: &DashboardConfig) -> Self {
        let mut state = Self {
            filters: init_filter_selection(&dataset),
            dataset,
            source,
            schema_mode: config.schema,
            panels: dashboard_panels(config.age_bins),
            snapshot: DashboardSnapshot::default(),
            section: Section::default(),
            table_sort: None,
            status_message: None,
        };
        state.refresh();
        state
    }

    /// Swap in a newly loaded dataset and reset filters and sorting.
    pub fn set_dataset(&mut self, dataset: Dataset, source: PathBuf) {
        self.filters = init_filter_selection(&dataset);
        self.dataset = dataset;
        self.source = source;
        self.table_sort = None;
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the snapshot after a filter or sort change.
    pub fn refresh(&mut self) {
        self.snapshot = dashboard::render(
            &self.dataset,
            &self.panels,
            &self.filters,
            self.table_sort,
        );
    }

    /// Toggle a single value in a field's filter.
    pub fn toggle_filter_value(&mut self, field: Field, value: &CellValue) {
        let selected = self.filters.entry(field).or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        self.refresh();
    }

    /// Select all values of a field.
    pub fn select_all(&mut self, field: Field) {
        if let Some(all_vals) = self.dataset.filter_values(field) {
            self.filters.insert(field, all_vals.clone());
            self.refresh();
        }
    }

    /// Deselect all values of a field.
    pub fn select_none(&mut self, field: Field) {
        self.filters.insert(field, BTreeSet::new());
        self.refresh();
    }

    /// Header click: ascending first, then descending on the same column.
    pub fn sort_by_column(&mut self, column: usize) {
        self.table_sort = match self.table_sort {
            Some(sort) if sort.column == column && sort.ascending => Some(TableSort {
                column,
                ascending: false,
            }),
            _ => Some(TableSort {
                column,
                ascending: true,
            }),
        };
        self.refresh();
    }

    /// Load another file; on failure the current dataset stays active.
    pub fn open(&mut self, path: &Path) {
        match loader::load_file(path, self.schema_mode) {
            Ok(dataset) => self.set_dataset(dataset, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
