use crate::data::filter::FilteredView;
use crate::data::model::{Attrition, Field};
use crate::error::PanelError;

use super::aggregate::{
    binned_histogram, count_for_outcome, mean_by_group, outcome_counts, proportion_table,
    ByOutcome, GroupRow, HistogramBin,
};
use super::correlation::{outcome_correlations, CorrelationEntry};
use super::summary::{box_by_outcome, BoxGroup};

// ---------------------------------------------------------------------------
// Panel descriptors
// ---------------------------------------------------------------------------

/// Navigation sections of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Macro,
    Micro,
    Table,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Macro, Section::Micro, Section::Table];

    pub fn title(self) -> &'static str {
        match self {
            Section::Macro => "📊 Macro Analysis",
            Section::Micro => "📈 Micro Analysis",
            Section::Table => "📋 Data Table",
        }
    }
}

/// What a panel aggregates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelKind {
    /// Outcome percentages per group.
    AttritionRate { field: Field },
    /// Rows with one outcome counted per group.
    OutcomeCount { field: Field, outcome: Attrition },
    /// Categorical buckets split by outcome.
    OutcomeHistogram { field: Field },
    /// Numeric field in equal-width bins, stacked by outcome.
    BinnedHistogram { field: Field, bins: usize },
    /// Mean of `value` per group, ascending.
    MeanByGroup { group: Field, value: Field },
    /// Distribution of `value` per outcome, optionally per category.
    BoxByOutcome { value: Field, across: Option<Field> },
    /// Correlation of every numeric column with the encoded outcome.
    OutcomeCorrelation,
}

/// Aggregated data ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    Proportions {
        field: Field,
        rows: Vec<GroupRow<ByOutcome<f64>>>,
    },
    Counts {
        field: Field,
        outcome: Attrition,
        rows: Vec<GroupRow<usize>>,
    },
    OutcomeHistogram {
        field: Field,
        rows: Vec<GroupRow<ByOutcome<usize>>>,
    },
    BinnedHistogram {
        field: Field,
        bins: Vec<HistogramBin>,
    },
    Means {
        group: Field,
        value: Field,
        rows: Vec<GroupRow<f64>>,
    },
    Boxes {
        value: Field,
        across: Option<Field>,
        groups: Vec<BoxGroup>,
    },
    Correlations(Vec<CorrelationEntry>),
}

impl PanelData {
    /// Nothing to draw (e.g. every filter narrowed to nothing).
    pub fn is_empty(&self) -> bool {
        match self {
            PanelData::Proportions { rows, .. } => rows.is_empty(),
            PanelData::Counts { rows, .. } => rows.is_empty(),
            PanelData::OutcomeHistogram { rows, .. } => rows.is_empty(),
            PanelData::BinnedHistogram { bins, .. } => bins.is_empty(),
            PanelData::Means { rows, .. } => rows.is_empty(),
            PanelData::Boxes { groups, .. } => groups.is_empty(),
            PanelData::Correlations(entries) => entries.is_empty(),
        }
    }
}

/// One independent chart on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub number: usize,
    pub title: &'static str,
    pub caption: &'static str,
    pub section: Section,
    pub kind: PanelKind,
}

impl Panel {
    /// Pure function from the filtered view to this panel's data.
    pub fn compute(&self, view: &FilteredView<'_>) -> Result<PanelData, PanelError> {
        Ok(match self.kind {
            PanelKind::AttritionRate { field } => PanelData::Proportions {
                field,
                rows: proportion_table(view, field)?,
            },
            PanelKind::OutcomeCount { field, outcome } => PanelData::Counts {
                field,
                outcome,
                rows: count_for_outcome(view, field, outcome)?,
            },
            PanelKind::OutcomeHistogram { field } => PanelData::OutcomeHistogram {
                field,
                rows: outcome_counts(view, field)?,
            },
            PanelKind::BinnedHistogram { field, bins } => PanelData::BinnedHistogram {
                field,
                bins: binned_histogram(view, field, bins)?,
            },
            PanelKind::MeanByGroup { group, value } => PanelData::Means {
                group,
                value,
                rows: mean_by_group(view, group, value)?,
            },
            PanelKind::BoxByOutcome { value, across } => PanelData::Boxes {
                value,
                across,
                groups: box_by_outcome(view, value, across)?,
            },
            PanelKind::OutcomeCorrelation => PanelData::Correlations(outcome_correlations(view)),
        })
    }
}

/// The full panel set, in page order.
#[rustfmt::skip]
pub fn dashboard_panels(age_bins: usize) -> Vec<Panel> {
    fn panel(
        number: usize,
        section: Section,
        title: &'static str,
        caption: &'static str,
        kind: PanelKind,
    ) -> Panel {
        Panel {
            number,
            title,
            caption,
            section,
            kind,
        }
    }
    use PanelKind::*;
    use Section::{Macro, Micro};

    vec![
        panel(1, Macro, "Attrition Rate by Department",
            "This shows which departments have the highest attrition rate.",
            AttritionRate { field: Field::Department }),
        panel(2, Macro, "Attrition by Job Role",
            "This chart displays attrition distribution across different job roles.",
            OutcomeCount { field: Field::JobRole, outcome: Attrition::Yes }),
        panel(3, Macro, "Attrition by Business Travel Frequency",
            "Tracks if frequent travel contributes to attrition.",
            OutcomeHistogram { field: Field::BusinessTravel }),
        panel(4, Macro, "Gender-wise Attrition",
            "Understand attrition trends based on gender.",
            OutcomeHistogram { field: Field::Gender }),
        panel(5, Macro, "Overtime vs Attrition",
            "Employees working overtime show higher attrition trends.",
            OutcomeHistogram { field: Field::OverTime }),
        panel(6, Macro, "Department-wise Avg Monthly Income",
            "Shows the average monthly income per department.",
            MeanByGroup { group: Field::Department, value: Field::MonthlyIncome }),
        panel(7, Macro, "Age Distribution",
            "Age distribution of employees with and without attrition.",
            BinnedHistogram { field: Field::Age, bins: age_bins }),
        panel(8, Micro, "Work-Life Balance vs Attrition",
            "Highlights the importance of work-life balance in retaining employees.",
            BoxByOutcome { value: Field::MonthlyIncome, across: Some(Field::WorkLifeBalance) }),
        panel(9, Micro, "Years at Company vs Attrition",
            "Shows how long-tenure affects attrition probability.",
            BoxByOutcome { value: Field::YearsAtCompany, across: None }),
        panel(10, Micro, "Job Satisfaction vs Attrition",
            "Indicates the role of job satisfaction in attrition.",
            OutcomeHistogram { field: Field::JobSatisfaction }),
        panel(11, Micro, "Environment Satisfaction vs Attrition",
            "Explores how employees' satisfaction with work environment impacts attrition.",
            OutcomeHistogram { field: Field::EnvironmentSatisfaction }),
        panel(12, Micro, "Performance Rating vs Attrition",
            "Check if low/high performers tend to leave more.",
            OutcomeHistogram { field: Field::PerformanceRating }),
        panel(13, Micro, "Training Times vs Attrition",
            "Training frequency and its relation to attrition.",
            OutcomeHistogram { field: Field::TrainingTimesLastYear }),
        panel(14, Micro, "Relationship Satisfaction vs Attrition",
            "Assesses if personal workplace relationships influence attrition.",
            OutcomeHistogram { field: Field::RelationshipSatisfaction }),
        panel(15, Micro, "Attrition Correlation Heatmap",
            "Displays correlation of numeric variables with attrition.",
            OutcomeCorrelation),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn panels_are_numbered_in_page_order() {
        let panels = dashboard_panels(20);
        assert_eq!(panels.len(), 15);
        for (i, p) in panels.iter().enumerate() {
            assert_eq!(p.number, i + 1);
        }
        assert!(panels[..7].iter().all(|p| p.section == Section::Macro));
        assert!(panels[7..].iter().all(|p| p.section == Section::Micro));
    }

    #[test]
    fn every_panel_computes_on_full_schema() {
        let ds = fixtures::employees();
        let view = FilteredView::all(&ds);
        for p in dashboard_panels(20) {
            let data = p.compute(&view).unwrap_or_else(|e| panic!("panel {}: {e}", p.number));
            assert!(!data.is_empty(), "panel {} is empty", p.number);
        }
    }

    #[test]
    fn every_panel_is_empty_on_empty_view() {
        let ds = fixtures::employees();
        let view = FilteredView::all(&ds).apply(&Default::default());
        for p in dashboard_panels(20) {
            assert!(p.compute(&view).unwrap().is_empty(), "panel {}", p.number);
        }
    }

    #[test]
    fn missing_field_fails_only_panels_that_use_it() {
        let ds = fixtures::dataset(
            &["Department", "JobRole", "Gender", "OverTime", "Attrition", "MonthlyIncome"],
            &[&["Sales", "Rep", "Male", "No", "Yes", "4000"]],
        );
        let view = FilteredView::all(&ds);
        let panels = dashboard_panels(20);

        let ok = |n: usize| panels[n - 1].compute(&view).is_ok();
        for n in [1, 2, 4, 5, 6, 15] {
            assert!(ok(n), "panel {n} should compute");
        }
        assert_eq!(
            panels[6].compute(&view),
            Err(PanelError::MissingField("Age"))
        );
        assert_eq!(
            panels[7].compute(&view),
            Err(PanelError::MissingField("WorkLifeBalance"))
        );
    }
}
