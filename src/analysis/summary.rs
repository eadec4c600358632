use std::collections::BTreeMap;

use crate::data::filter::FilteredView;
use crate::data::model::{Attrition, CellValue, Field};
use crate::error::PanelError;

// ---------------------------------------------------------------------------
// Five-number summary with Tukey whiskers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FiveNumberSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Most extreme sample within `1.5 × IQR` below `q1`.
    pub lower_whisker: f64,
    /// Most extreme sample within `1.5 × IQR` above `q3`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl FiveNumberSummary {
    /// `None` for an empty sample.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
            .iter()
            .partition(|v| **v >= low_fence && **v <= high_fence);
        // Quartiles lie inside the fences, so `inside` is never empty.
        let lower_whisker = inside.first().copied().unwrap_or(q1);
        let upper_whisker = inside.last().copied().unwrap_or(q3);

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Distribution of a numeric field per outcome (optionally per category)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    /// Category of the crossing field, `None` when not crossed.
    pub category: Option<CellValue>,
    pub outcome: Attrition,
    pub summary: FiveNumberSummary,
}

/// Summaries of `value` grouped by outcome, optionally crossed with
/// `across`. Groups are ordered by category, then outcome.
pub fn box_by_outcome(
    view: &FilteredView<'_>,
    value: Field,
    across: Option<Field>,
) -> Result<Vec<BoxGroup>, PanelError> {
    let schema = view.dataset().schema();
    let value_col = schema.numeric_column(value)?;
    let across_col = across.map(|f| schema.column(f)).transpose()?;

    let mut samples: BTreeMap<(Option<&CellValue>, Attrition), Vec<f64>> = BTreeMap::new();
    for record in view.records() {
        let Some(v) = record.cell(value_col).as_f64() else {
            continue;
        };
        let category = across_col.map(|c| record.cell(c));
        samples
            .entry((category, record.attrition()))
            .or_default()
            .push(v);
    }

    Ok(samples
        .into_iter()
        .filter_map(|((category, outcome), values)| {
            FiveNumberSummary::from_samples(&values).map(|summary| BoxGroup {
                category: category.cloned(),
                outcome,
                summary,
            })
        })
        .collect())
}
