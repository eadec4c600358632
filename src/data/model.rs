use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, PanelError};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the attrition table
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell mirroring common Pandas dtypes.
/// Filter selections are `BTreeSet`s of cells, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

/// Markers read as missing in delimited text, as Pandas' `read_csv` does.
const MISSING_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
];

impl CellValue {
    /// Infer a typed cell from raw delimited-text input.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() || MISSING_MARKERS.contains(&s) {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::Text(s.to_string())
    }

    /// Float cell; NaN and infinities become `Null`.
    pub fn float(v: f64) -> Self {
        if v.is_finite() {
            CellValue::Float(v)
        } else {
            CellValue::Null
        }
    }

    /// Numeric view of the cell, `None` for text, booleans and nulls.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Attrition – the binary outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attrition {
    No,
    Yes,
}

impl Attrition {
    /// Legend order.
    pub const ALL: [Attrition; 2] = [Attrition::No, Attrition::Yes];

    pub fn label(self) -> &'static str {
        match self {
            Attrition::No => "No",
            Attrition::Yes => "Yes",
        }
    }

    /// `Yes → 1`, `No → 0`, as used by the correlation panel.
    pub fn encoded(self) -> f64 {
        match self {
            Attrition::No => 0.0,
            Attrition::Yes => 1.0,
        }
    }

    pub fn from_cell(cell: &CellValue) -> Option<Self> {
        match cell {
            CellValue::Text(s) if s == "Yes" => Some(Attrition::Yes),
            CellValue::Text(s) if s == "No" => Some(Attrition::No),
            _ => None,
        }
    }
}

impl fmt::Display for Attrition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Field – typed addresses of the columns the dashboard reads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// One of the four side-panel filters.
    Filter,
    /// The Attrition column.
    Outcome,
    Categorical,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Department,
    JobRole,
    Gender,
    OverTime,
    Attrition,
    BusinessTravel,
    WorkLifeBalance,
    JobSatisfaction,
    EnvironmentSatisfaction,
    PerformanceRating,
    RelationshipSatisfaction,
    TrainingTimesLastYear,
    Age,
    MonthlyIncome,
    YearsAtCompany,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Department,
        Field::JobRole,
        Field::Gender,
        Field::OverTime,
        Field::Attrition,
        Field::BusinessTravel,
        Field::WorkLifeBalance,
        Field::JobSatisfaction,
        Field::EnvironmentSatisfaction,
        Field::PerformanceRating,
        Field::RelationshipSatisfaction,
        Field::TrainingTimesLastYear,
        Field::Age,
        Field::MonthlyIncome,
        Field::YearsAtCompany,
    ];

    /// Side-panel filters, in display order.
    pub const FILTERS: [Field; 4] = [
        Field::Department,
        Field::JobRole,
        Field::Gender,
        Field::OverTime,
    ];

    /// Header name in the source table.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::Department => "Department",
            Field::JobRole => "JobRole",
            Field::Gender => "Gender",
            Field::OverTime => "OverTime",
            Field::Attrition => "Attrition",
            Field::BusinessTravel => "BusinessTravel",
            Field::WorkLifeBalance => "WorkLifeBalance",
            Field::JobSatisfaction => "JobSatisfaction",
            Field::EnvironmentSatisfaction => "EnvironmentSatisfaction",
            Field::PerformanceRating => "PerformanceRating",
            Field::RelationshipSatisfaction => "RelationshipSatisfaction",
            Field::TrainingTimesLastYear => "TrainingTimesLastYear",
            Field::Age => "Age",
            Field::MonthlyIncome => "MonthlyIncome",
            Field::YearsAtCompany => "YearsAtCompany",
        }
    }

    /// Human-readable label for widgets and axes.
    pub fn label(self) -> &'static str {
        match self {
            Field::JobRole => "Job Role",
            Field::BusinessTravel => "Business Travel",
            Field::WorkLifeBalance => "Work-Life Balance",
            Field::JobSatisfaction => "Job Satisfaction",
            Field::EnvironmentSatisfaction => "Environment Satisfaction",
            Field::PerformanceRating => "Performance Rating",
            Field::RelationshipSatisfaction => "Relationship Satisfaction",
            Field::TrainingTimesLastYear => "Training Times Last Year",
            Field::MonthlyIncome => "Monthly Income",
            Field::YearsAtCompany => "Years at Company",
            other => other.column_name(),
        }
    }

    pub fn role(self) -> FieldRole {
        match self {
            Field::Department | Field::JobRole | Field::Gender | Field::OverTime => {
                FieldRole::Filter
            }
            Field::Attrition => FieldRole::Outcome,
            Field::Age | Field::MonthlyIncome | Field::YearsAtCompany => FieldRole::Numeric,
            _ => FieldRole::Categorical,
        }
    }

    fn is_required(self, mode: SchemaMode) -> bool {
        match mode {
            SchemaMode::Strict => true,
            SchemaMode::Lenient => matches!(self.role(), FieldRole::Filter | FieldRole::Outcome),
        }
    }
}

/// How much of the known schema must be present at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// Every known column is required; numeric fields must be numeric.
    #[default]
    Strict,
    /// Only Attrition and the filter columns are required; panels report
    /// anything else that is missing.
    Lenient,
}

// ---------------------------------------------------------------------------
// Schema – column list plus resolved field indices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<ColumnInfo>,
    fields: BTreeMap<Field, usize>,
}

impl Schema {
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.fields.get(&field).copied()
    }

    /// Column index of `field`, or the panel-level error for its absence.
    pub fn column(&self, field: Field) -> Result<usize, PanelError> {
        self.index_of(field)
            .ok_or(PanelError::MissingField(field.column_name()))
    }

    /// Like [`Schema::column`] but also requires a numeric column.
    pub fn numeric_column(&self, field: Field) -> Result<usize, PanelError> {
        let idx = self.column(field)?;
        match self.columns[idx].kind {
            ColumnKind::Numeric => Ok(idx),
            ColumnKind::Text => Err(PanelError::NonNumeric(field.column_name())),
        }
    }

    /// Every numeric column, in header order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (usize, &ColumnInfo)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == ColumnKind::Numeric)
    }
}

// ---------------------------------------------------------------------------
// Record – one employee (one row of the source table)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Record {
    cells: Vec<CellValue>,
    attrition: Attrition,
}

impl Record {
    pub fn cell(&self, column: usize) -> &CellValue {
        &self.cells[column]
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn attrition(&self) -> Attrition {
        self.attrition
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The validated, immutable dataset with pre-computed filter values.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
    /// For each filter field the sorted set of distinct values.
    filter_values: BTreeMap<Field, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build from raw text rows (CSV/TSV), inferring each cell's type.
    pub fn from_text_rows(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        mode: SchemaMode,
    ) -> Result<Self, LoadError> {
        let rows = rows
            .into_iter()
            .map(|row| row.iter().map(|s| CellValue::parse(s)).collect())
            .collect();
        Self::from_cells(headers, rows, mode)
    }

    /// Validate the table against the known fields and index it.
    pub fn from_cells(
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        mode: SchemaMode,
    ) -> Result<Self, LoadError> {
        if rows.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut seen = BTreeSet::new();
        for h in &headers {
            if !seen.insert(h.as_str()) {
                return Err(LoadError::DuplicateColumn(h.clone()));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(LoadError::RaggedRow {
                    row: i + 1,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
        }

        let columns: Vec<ColumnInfo> = headers
            .into_iter()
            .enumerate()
            .map(|(idx, name)| ColumnInfo {
                kind: infer_kind(rows.iter().map(|r| &r[idx])),
                name,
            })
            .collect();

        let mut fields = BTreeMap::new();
        for field in Field::ALL {
            match columns.iter().position(|c| c.name == field.column_name()) {
                Some(idx) => {
                    if mode == SchemaMode::Strict
                        && field.role() == FieldRole::Numeric
                        && columns[idx].kind != ColumnKind::Numeric
                    {
                        return Err(LoadError::NonNumericColumn(field.column_name()));
                    }
                    fields.insert(field, idx);
                }
                None if field.is_required(mode) => {
                    return Err(LoadError::MissingColumn(field.column_name()));
                }
                None => {}
            }
        }
        let schema = Schema { columns, fields };

        let outcome_idx = schema
            .index_of(Field::Attrition)
            .ok_or(LoadError::MissingColumn(Field::Attrition.column_name()))?;

        let mut records = Vec::with_capacity(rows.len());
        for (i, cells) in rows.into_iter().enumerate() {
            let attrition =
                Attrition::from_cell(&cells[outcome_idx]).ok_or_else(|| LoadError::InvalidOutcome {
                    row: i + 1,
                    value: cells[outcome_idx].to_string(),
                })?;
            records.push(Record { cells, attrition });
        }

        let mut filter_values: BTreeMap<Field, BTreeSet<CellValue>> = BTreeMap::new();
        for field in Field::FILTERS {
            if let Some(idx) = schema.index_of(field) {
                let values = records.iter().map(|r| r.cell(idx).clone()).collect();
                filter_values.insert(field, values);
            }
        }

        Ok(Dataset {
            schema,
            records,
            filter_values,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> &Record {
        &self.records[index]
    }

    /// Distinct values of a filter field, sorted.
    pub fn filter_values(&self, field: Field) -> Option<&BTreeSet<CellValue>> {
        self.filter_values.get(&field)
    }
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a CellValue>) -> ColumnKind {
    let mut any_numeric = false;
    for cell in cells.filter(|c| !c.is_null()) {
        match cell {
            CellValue::Integer(_) | CellValue::Float(_) => any_numeric = true,
            _ => return ColumnKind::Text,
        }
    }
    if any_numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn parse_infers_cell_types() {
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse(" 42 "), CellValue::Integer(42));
        assert_eq!(CellValue::parse("1.5"), CellValue::Float(1.5));
        assert_eq!(CellValue::parse("true"), CellValue::Bool(true));
        assert_eq!(CellValue::parse("Sales"), CellValue::Text("Sales".into()));
    }

    #[test]
    fn missing_markers_and_non_finite_floats_are_null() {
        for raw in ["NA", "N/A", "NaN", "nan", "null", "NULL", "inf", "-inf"] {
            assert_eq!(CellValue::parse(raw), CellValue::Null, "{raw}");
        }
        assert_eq!(CellValue::float(f64::NAN), CellValue::Null);
        assert_eq!(CellValue::float(2.5), CellValue::Float(2.5));
        assert_eq!(CellValue::Float(f64::INFINITY).as_f64(), None);
    }

    #[test]
    fn numeric_column_with_missing_markers_stays_numeric() {
        let ds = fixtures::dataset(
            &["Department", "JobRole", "Gender", "OverTime", "Attrition", "Age"],
            &[
                &["A", "R", "M", "No", "Yes", "25"],
                &["A", "R", "M", "No", "No", "NA"],
                &["A", "R", "M", "No", "No", "NaN"],
            ],
        );
        let age = ds.schema().numeric_column(Field::Age).unwrap();
        assert!(ds.records()[1].cell(age).is_null());
        assert!(ds.records()[2].cell(age).is_null());
    }

    #[test]
    fn cells_order_by_type_then_value() {
        let mut cells = vec![
            CellValue::Text("b".into()),
            CellValue::Integer(3),
            CellValue::Null,
            CellValue::Integer(1),
            CellValue::Text("a".into()),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                CellValue::Null,
                CellValue::Integer(1),
                CellValue::Integer(3),
                CellValue::Text("a".into()),
                CellValue::Text("b".into()),
            ]
        );
    }

    #[test]
    fn attrition_parses_only_yes_and_no() {
        assert_eq!(Attrition::from_cell(&CellValue::Text("Yes".into())), Some(Attrition::Yes));
        assert_eq!(Attrition::from_cell(&CellValue::Text("No".into())), Some(Attrition::No));
        assert_eq!(Attrition::from_cell(&CellValue::Text("yes".into())), None);
        assert_eq!(Attrition::from_cell(&CellValue::Integer(1)), None);
    }

    #[test]
    fn full_schema_resolves_every_field() {
        let ds = fixtures::employees();
        for field in Field::ALL {
            assert!(ds.schema().index_of(field).is_some(), "{field:?}");
        }
        let age = ds.schema().numeric_column(Field::Age).unwrap();
        assert_eq!(ds.schema().columns()[age].kind, ColumnKind::Numeric);
        assert!(ds.schema().numeric_column(Field::Department).is_err());
    }

    #[test]
    fn strict_mode_requires_every_known_column() {
        let err = fixtures::try_dataset(
            &["Department", "JobRole", "Gender", "OverTime", "Attrition"],
            &[&["Sales", "Manager", "Male", "No", "Yes"]],
            SchemaMode::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(_)));
    }

    #[test]
    fn lenient_mode_requires_only_filters_and_outcome() {
        let ds = fixtures::try_dataset(
            &["Department", "JobRole", "Gender", "OverTime", "Attrition"],
            &[&["Sales", "Manager", "Male", "No", "Yes"]],
            SchemaMode::Lenient,
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(
            ds.schema().column(Field::Age),
            Err(PanelError::MissingField("Age"))
        );

        let err = fixtures::try_dataset(
            &["Department", "JobRole", "Gender", "Attrition"],
            &[&["Sales", "Manager", "Male", "Yes"]],
            SchemaMode::Lenient,
        )
        .unwrap_err();
        assert_eq!(err, LoadError::MissingColumn("OverTime"));
    }

    #[test]
    fn strict_mode_rejects_text_in_numeric_field() {
        let headers: Vec<&str> = Field::ALL.iter().map(|f| f.column_name()).collect();
        let mut row: Vec<&str> = fixtures::DEFAULT_ROW.to_vec();
        let age = headers.iter().position(|h| *h == "Age").unwrap();
        row[age] = "thirty";
        let err =
            fixtures::try_dataset(&headers, &[row.as_slice()], SchemaMode::Strict).unwrap_err();
        assert_eq!(err, LoadError::NonNumericColumn("Age"));
    }

    #[test]
    fn invalid_outcome_is_reported_with_row() {
        let err = fixtures::try_dataset(
            &["Department", "JobRole", "Gender", "OverTime", "Attrition"],
            &[
                &["Sales", "Manager", "Male", "No", "Yes"],
                &["Sales", "Manager", "Male", "No", "Maybe"],
            ],
            SchemaMode::Lenient,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LoadError::InvalidOutcome {
                row: 2,
                value: "Maybe".into()
            }
        );
    }

    #[test]
    fn ragged_and_empty_tables_are_rejected() {
        let headers = vec!["Attrition".to_string(), "Department".to_string()];
        let err = Dataset::from_text_rows(
            headers.clone(),
            vec![vec!["Yes".into()]],
            SchemaMode::Lenient,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::RaggedRow { row: 1, .. }));

        let err = Dataset::from_text_rows(headers, Vec::new(), SchemaMode::Lenient).unwrap_err();
        assert_eq!(err, LoadError::Empty);
    }

    #[test]
    fn filter_values_are_distinct_and_sorted() {
        let ds = fixtures::employees();
        let depts: Vec<String> = ds
            .filter_values(Field::Department)
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(depts, vec!["Human Resources", "R&D", "Sales"]);
    }
}
