use std::collections::BTreeMap;

use crate::data::filter::FilteredView;
use crate::data::model::{Attrition, CellValue, Field};
use crate::error::PanelError;

// ---------------------------------------------------------------------------
// Result shapes
// ---------------------------------------------------------------------------

/// One value per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ByOutcome<T> {
    pub no: T,
    pub yes: T,
}

impl<T> ByOutcome<T> {
    pub fn get(&self, outcome: Attrition) -> &T {
        match outcome {
            Attrition::No => &self.no,
            Attrition::Yes => &self.yes,
        }
    }

    pub fn get_mut(&mut self, outcome: Attrition) -> &mut T {
        match outcome {
            Attrition::No => &mut self.no,
            Attrition::Yes => &mut self.yes,
        }
    }
}

impl ByOutcome<usize> {
    pub fn total(&self) -> usize {
        self.no + self.yes
    }
}

/// A computed value for one group key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow<T> {
    pub group: CellValue,
    pub value: T,
}

/// One equal-width bucket of a numeric field.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub counts: ByOutcome<usize>,
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Count each outcome within every group of `field`, groups in key order.
pub fn outcome_counts(
    view: &FilteredView<'_>,
    field: Field,
) -> Result<Vec<GroupRow<ByOutcome<usize>>>, PanelError> {
    let col = view.dataset().schema().column(field)?;
    let mut groups: BTreeMap<&CellValue, ByOutcome<usize>> = BTreeMap::new();
    for record in view.records() {
        *groups
            .entry(record.cell(col))
            .or_default()
            .get_mut(record.attrition()) += 1;
    }
    Ok(groups
        .into_iter()
        .map(|(group, value)| GroupRow {
            group: group.clone(),
            value,
        })
        .collect())
}

/// Percentage of each outcome within every group; each row sums to 100.
/// An outcome absent from a group is reported as 0.
pub fn proportion_table(
    view: &FilteredView<'_>,
    field: Field,
) -> Result<Vec<GroupRow<ByOutcome<f64>>>, PanelError> {
    Ok(outcome_counts(view, field)?
        .into_iter()
        .map(|row| {
            let total = row.value.total() as f64;
            GroupRow {
                group: row.group,
                value: ByOutcome {
                    no: row.value.no as f64 / total * 100.0,
                    yes: row.value.yes as f64 / total * 100.0,
                },
            }
        })
        .collect())
}

/// Rows with the given outcome counted per group of `field`, in key order.
pub fn count_for_outcome(
    view: &FilteredView<'_>,
    field: Field,
    outcome: Attrition,
) -> Result<Vec<GroupRow<usize>>, PanelError> {
    Ok(outcome_counts(view, field)?
        .into_iter()
        .filter_map(|row| {
            let n = *row.value.get(outcome);
            (n > 0).then_some(GroupRow {
                group: row.group,
                value: n,
            })
        })
        .collect())
}

/// Arithmetic mean of `value` per group of `group`, sorted ascending by
/// mean (ties by key). Null values are skipped; all-null groups are dropped.
pub fn mean_by_group(
    view: &FilteredView<'_>,
    group: Field,
    value: Field,
) -> Result<Vec<GroupRow<f64>>, PanelError> {
    let schema = view.dataset().schema();
    let group_col = schema.column(group)?;
    let value_col = schema.numeric_column(value)?;

    let mut sums: BTreeMap<&CellValue, (f64, usize)> = BTreeMap::new();
    for record in view.records() {
        if let Some(v) = record.cell(value_col).as_f64() {
            let entry = sums.entry(record.cell(group_col)).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }

    let mut rows: Vec<GroupRow<f64>> = sums
        .into_iter()
        .map(|(g, (sum, n))| GroupRow {
            group: g.clone(),
            value: sum / n as f64,
        })
        .collect();
    // Stable sort keeps key order for equal means.
    rows.sort_by(|a, b| a.value.total_cmp(&b.value));
    Ok(rows)
}

/// Equal-width histogram of a numeric field over `[min, max]`, split by
/// outcome. The last bin is closed on the right.
pub fn binned_histogram(
    view: &FilteredView<'_>,
    field: Field,
    bins: usize,
) -> Result<Vec<HistogramBin>, PanelError> {
    if bins == 0 {
        return Err(PanelError::InvalidBins);
    }
    let col = view.dataset().schema().numeric_column(field)?;

    let samples: Vec<(f64, Attrition)> = view
        .records()
        .filter_map(|r| r.cell(col).as_f64().map(|v| (v, r.attrition())))
        .collect();
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let min = samples.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
    let max = samples.iter().map(|(v, _)| *v).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        let mut counts = ByOutcome::default();
        for (_, outcome) in &samples {
            *counts.get_mut(*outcome) += 1;
        }
        return Ok(vec![HistogramBin {
            start: min,
            end: max,
            counts,
        }]);
    }

    let width = range / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: if i + 1 == bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            counts: ByOutcome::default(),
        })
        .collect();
    for (v, outcome) in samples {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        *out[idx].counts.get_mut(outcome) += 1;
    }
    Ok(out)
}
