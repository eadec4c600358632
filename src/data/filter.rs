use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Dataset, Field, Record};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per filter field
// ---------------------------------------------------------------------------

/// Per-field selection state: maps filter field → set of allowed values.
/// A field that is absent or has an empty set admits no records.
pub type FilterSelection = BTreeMap<Field, BTreeSet<CellValue>>;

/// Initialise a [`FilterSelection`] with every distinct value selected.
pub fn init_filter_selection(dataset: &Dataset) -> FilterSelection {
    Field::FILTERS
        .iter()
        .filter_map(|field| {
            dataset
                .filter_values(*field)
                .map(|vals| (*field, vals.clone()))
        })
        .collect()
}

/// Whether `record` passes every filter field.
///
/// AND across fields, OR within a field's selected set.
fn passes(dataset: &Dataset, record: &Record, selection: &FilterSelection) -> bool {
    Field::FILTERS.iter().all(|field| {
        let Some(col) = dataset.schema().index_of(*field) else {
            return false;
        };
        selection
            .get(field)
            .is_some_and(|allowed| allowed.contains(record.cell(col)))
    })
}

// ---------------------------------------------------------------------------
// FilteredView – the rows that survive the current selection
// ---------------------------------------------------------------------------

/// An order-preserving subsequence of a [`Dataset`].
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// The unfiltered dataset.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Keep only the rows of this view that pass `selection`.
    pub fn apply(&self, selection: &FilterSelection) -> FilteredView<'a> {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| passes(self.dataset, self.dataset.record(i), selection))
            .collect();
        FilteredView {
            dataset: self.dataset,
            indices,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Row indices into the dataset, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| dataset.record(i))
    }
}

/// The Filter Stage: reduce `dataset` to the records matching `selection`.
pub fn apply_filters<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView::all(dataset).apply(selection)
}

// ---------------------------------------------------------------------------
// Table ordering
// ---------------------------------------------------------------------------

/// Sort key for the data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub column: usize,
    pub ascending: bool,
}

/// Row indices of `view` ordered for display. Ties keep dataset order.
pub fn table_order(view: &FilteredView<'_>, sort: Option<TableSort>) -> Vec<usize> {
    let mut rows = view.indices().to_vec();
    let Some(sort) = sort else {
        return rows;
    };
    if sort.column >= view.dataset().schema().columns().len() {
        return rows;
    }
    let ds = view.dataset();
    rows.sort_by(|&a, &b| {
        let ord = ds.record(a).cell(sort.column).cmp(ds.record(b).cell(sort.column));
        let ord = if sort.ascending { ord } else { ord.reverse() };
        match ord {
            Ordering::Equal => a.cmp(&b),
            other => other,
        }
    });
    rows
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::analysis::aggregate::proportion_table;
    use crate::data::fixtures;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn three_rows() -> Dataset {
        fixtures::dataset(
            &["Department", "JobRole", "Gender", "OverTime", "Attrition"],
            &[
                &["Sales", "Rep", "Male", "No", "Yes"],
                &["Sales", "Rep", "Female", "No", "No"],
                &["R&D", "Scientist", "Male", "Yes", "No"],
            ],
        )
    }

    #[test]
    fn default_selection_keeps_everything() {
        let ds = fixtures::employees();
        let sel = init_filter_selection(&ds);
        assert_eq!(sel.len(), 4);
        let view = apply_filters(&ds, &sel);
        assert_eq!(view.indices(), (0..ds.len()).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn department_scenario() {
        let ds = three_rows();
        let mut sel = init_filter_selection(&ds);
        sel.insert(Field::Department, BTreeSet::from([text("Sales")]));
        let view = apply_filters(&ds, &sel);
        assert_eq!(view.len(), 2);
        let dept = ds.schema().index_of(Field::Department).unwrap();
        assert!(view.records().all(|r| r.cell(dept) == &text("Sales")));
    }

    #[test]
    fn empty_set_for_any_field_empties_the_view() {
        let ds = fixtures::employees();
        for field in Field::FILTERS {
            let mut sel = init_filter_selection(&ds);
            sel.insert(field, BTreeSet::new());
            assert!(apply_filters(&ds, &sel).is_empty(), "{field:?}");
        }
    }

    #[test]
    fn missing_field_in_selection_is_not_select_all() {
        let ds = fixtures::employees();
        let mut sel = init_filter_selection(&ds);
        sel.remove(&Field::Gender);
        assert!(apply_filters(&ds, &sel).is_empty());
    }

    #[test]
    fn view_is_ordered_subset_matching_every_filter() {
        let ds = fixtures::employees();
        let mut sel = init_filter_selection(&ds);
        sel.insert(Field::Gender, BTreeSet::from([text("Female")]));
        sel.insert(Field::OverTime, BTreeSet::from([text("No")]));
        let view = apply_filters(&ds, &sel);

        assert!(view.len() <= ds.len());
        assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
        for record in view.records() {
            for field in Field::FILTERS {
                let col = ds.schema().index_of(field).unwrap();
                assert!(sel[&field].contains(record.cell(col)));
            }
        }
        assert_eq!(view.indices(), &[1, 6]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = fixtures::employees();
        let mut sel = init_filter_selection(&ds);
        sel.insert(Field::Department, BTreeSet::from([text("R&D"), text("Sales")]));
        sel.insert(Field::OverTime, BTreeSet::from([text("Yes")]));
        let once = apply_filters(&ds, &sel);
        let twice = once.apply(&sel);
        assert_eq!(once.indices(), twice.indices());
    }

    #[test]
    fn unknown_selected_values_are_harmless() {
        let ds = three_rows();
        let mut sel = init_filter_selection(&ds);
        sel.insert(Field::Department, BTreeSet::from([text("Legal")]));
        assert!(apply_filters(&ds, &sel).is_empty());
    }

    #[test]
    fn table_order_sorts_by_column_and_keeps_ties_stable() {
        let ds = three_rows();
        let view = FilteredView::all(&ds);
        let dept = ds.schema().index_of(Field::Department).unwrap();

        let asc = table_order(&view, Some(TableSort { column: dept, ascending: true }));
        assert_eq!(asc, vec![2, 0, 1]);

        let desc = table_order(&view, Some(TableSort { column: dept, ascending: false }));
        assert_eq!(desc, vec![0, 1, 2]);

        assert_eq!(table_order(&view, None), vec![0, 1, 2]);
    }

    /// Keep the `i`-th distinct value of each filter field where `masks[f][i]` is set.
    fn selection_from_masks(ds: &Dataset, masks: &[Vec<bool>]) -> FilterSelection {
        Field::FILTERS
            .iter()
            .zip(masks)
            .map(|(&field, mask)| {
                let values = ds.filter_values(field).cloned().unwrap_or_default();
                let picked = values
                    .into_iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(value, _)| value)
                    .collect();
                (field, picked)
            })
            .collect()
    }

    fn masks() -> impl Strategy<Value = Vec<Vec<bool>>> {
        prop::collection::vec(prop::collection::vec(any::<bool>(), 8), Field::FILTERS.len())
    }

    proptest! {
        #[test]
        fn prop_view_is_exactly_the_matching_records(masks in masks()) {
            let ds = fixtures::employees();
            let sel = selection_from_masks(&ds, &masks);
            let view = apply_filters(&ds, &sel);

            prop_assert!(view.len() <= ds.len());
            prop_assert!(view.indices().windows(2).all(|w| w[0] < w[1]));

            let kept: BTreeSet<usize> = view.indices().iter().copied().collect();
            for (i, record) in ds.records().iter().enumerate() {
                let matches = Field::FILTERS.iter().all(|field| {
                    let col = ds.schema().index_of(*field).unwrap();
                    sel[field].contains(record.cell(col))
                });
                prop_assert_eq!(matches, kept.contains(&i));
            }
        }

        #[test]
        fn prop_filtering_is_idempotent(masks in masks()) {
            let ds = fixtures::employees();
            let sel = selection_from_masks(&ds, &masks);
            let once = apply_filters(&ds, &sel);
            let twice = once.apply(&sel);
            prop_assert_eq!(once.indices(), twice.indices());
        }

        #[test]
        fn prop_proportion_rows_sum_to_one_hundred(masks in masks()) {
            let ds = fixtures::employees();
            let view = apply_filters(&ds, &selection_from_masks(&ds, &masks));
            for field in [Field::Department, Field::JobRole, Field::BusinessTravel, Field::Gender] {
                for row in proportion_table(&view, field).unwrap() {
                    prop_assert!((row.value.no + row.value.yes - 100.0).abs() < 1e-9);
                }
            }
        }
    }
}
