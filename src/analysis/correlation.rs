use std::cmp::Ordering;
use std::fmt;

use crate::data::filter::FilteredView;

/// Pearson coefficient, or `Undefined` when fewer than two complete pairs
/// exist or either side has zero variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Defined(f64),
    Undefined,
}

impl Correlation {
    pub fn value(self) -> Option<f64> {
        match self {
            Correlation::Defined(r) => Some(r),
            Correlation::Undefined => None,
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Defined(r) => write!(f, "{r:.2}"),
            Correlation::Undefined => f.write_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationEntry {
    pub column: String,
    pub correlation: Correlation,
}

fn is_constant(mut samples: impl Iterator<Item = f64>) -> bool {
    match samples.next() {
        Some(first) => samples.all(|v| v == first),
        None => true,
    }
}

/// Pearson correlation over paired samples.
pub fn pearson(pairs: &[(f64, f64)]) -> Correlation {
    let n = pairs.len();
    if n < 2
        || is_constant(pairs.iter().map(|&(x, _)| x))
        || is_constant(pairs.iter().map(|&(_, y)| y))
    {
        return Correlation::Undefined;
    }
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let r = sxy / (sxx * syy).sqrt();
    if !r.is_finite() {
        return Correlation::Undefined;
    }
    Correlation::Defined(r.clamp(-1.0, 1.0))
}

/// Correlation of every numeric column with the encoded outcome
/// (`Yes → 1`, `No → 0`), sorted descending; undefined entries last.
/// Nulls are dropped pairwise.
pub fn outcome_correlations(view: &FilteredView<'_>) -> Vec<CorrelationEntry> {
    if view.is_empty() {
        return Vec::new();
    }
    let schema = view.dataset().schema();

    let mut entries: Vec<CorrelationEntry> = schema
        .numeric_columns()
        .map(|(idx, info)| {
            let pairs: Vec<(f64, f64)> = view
                .records()
                .filter_map(|r| r.cell(idx).as_f64().map(|v| (v, r.attrition().encoded())))
                .collect();
            CorrelationEntry {
                column: info.name.clone(),
                correlation: pearson(&pairs),
            }
        })
        .collect();

    entries.sort_by(|a, b| match (a.correlation, b.correlation) {
        (Correlation::Defined(x), Correlation::Defined(y)) => y.total_cmp(&x),
        (Correlation::Defined(_), Correlation::Undefined) => Ordering::Less,
        (Correlation::Undefined, Correlation::Defined(_)) => Ordering::Greater,
        (Correlation::Undefined, Correlation::Undefined) => Ordering::Equal,
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    fn approx(c: Correlation, expected: f64) -> bool {
        c.value().is_some_and(|r| (r - expected).abs() < 1e-9)
    }

    #[test]
    fn pearson_known_values() {
        assert!(approx(pearson(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]), 1.0));
        assert!(approx(pearson(&[(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]), -1.0));
        let alternating = [(1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)];
        assert!(approx(pearson(&alternating), -0.4472135954999579));
    }

    #[test]
    fn pearson_undefined_cases() {
        assert_eq!(pearson(&[]), Correlation::Undefined);
        assert_eq!(pearson(&[(1.0, 1.0)]), Correlation::Undefined);
        assert_eq!(pearson(&[(5.0, 0.0), (5.0, 1.0)]), Correlation::Undefined);
        assert_eq!(pearson(&[(1.0, 1.0), (2.0, 1.0)]), Correlation::Undefined);
        assert_eq!(pearson(&[(0.1, 1.0), (0.1, 0.0), (0.1, 0.0)]), Correlation::Undefined);
        assert_eq!(pearson(&[(f64::NAN, 1.0), (2.0, 0.0), (3.0, 0.0)]), Correlation::Undefined);
    }

    #[test]
    fn non_integer_constant_column_is_undefined() {
        let ds = fixtures::dataset(
            &["Department", "JobRole", "Gender", "OverTime", "Attrition", "Rate"],
            &[
                &["A", "R", "M", "No", "Yes", "0.1"],
                &["A", "R", "M", "No", "No", "0.1"],
                &["A", "R", "M", "No", "No", "0.1"],
            ],
        );
        let entries = outcome_correlations(&FilteredView::all(&ds));
        assert_eq!(entries[0].correlation, Correlation::Undefined);
        assert_eq!(entries[0].correlation.to_string(), "undefined");
    }

    #[test]
    fn nan_cells_are_skipped_pairwise() {
        let ds = fixtures::dataset(
            &["Department", "JobRole", "Gender", "OverTime", "Attrition", "MonthlyIncome"],
            &[
                &["A", "R", "M", "No", "Yes", "1000"],
                &["A", "R", "M", "No", "No", "NaN"],
                &["A", "R", "M", "No", "No", "3000"],
            ],
        );
        let entries = outcome_correlations(&FilteredView::all(&ds));
        assert!(approx(entries[0].correlation, -1.0));
    }

    #[test]
    fn single_numeric_column_gives_single_row() {
        let ds = fixtures::dataset(
            &["Department", "JobRole", "Gender", "OverTime", "Attrition", "Age"],
            &[
                &["A", "R", "M", "No", "Yes", "25"],
                &["A", "R", "M", "No", "No", "40"],
                &["A", "R", "M", "No", "No", "45"],
            ],
        );
        let entries = outcome_correlations(&FilteredView::all(&ds));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].column, "Age");
        assert!(entries[0].correlation.value().unwrap() < 0.0);
    }

    #[test]
    fn constant_columns_are_undefined_and_sorted_last() {
        let ds = fixtures::employees();
        let entries = outcome_correlations(&FilteredView::all(&ds));
        let last = entries.last().unwrap();
        assert_eq!(last.column, "EmployeeCount");
        assert_eq!(last.correlation, Correlation::Undefined);
        assert_eq!(last.correlation.to_string(), "undefined");

        let defined: Vec<f64> = entries.iter().filter_map(|e| e.correlation.value()).collect();
        assert!(defined.windows(2).all(|w| w[0] >= w[1]));
        assert!(defined.iter().all(|r| (-1.0..=1.0).contains(r)));
        assert!(entries.iter().all(|e| e.column != "Attrition"));
    }

    #[test]
    fn empty_view_has_no_rows() {
        let ds = fixtures::employees();
        let view = FilteredView::all(&ds).apply(&Default::default());
        assert!(view.is_empty());
        assert!(outcome_correlations(&view).is_empty());
    }
}
