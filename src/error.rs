use thiserror::Error;

// ---------------------------------------------------------------------------
// Startup errors: the dataset cannot back the dashboard at all
// ---------------------------------------------------------------------------

/// Schema and content problems found while building a [`Dataset`].
///
/// I/O and parse failures are reported through `anyhow` context by the
/// loaders; this enum covers what is wrong with a table that *was* read.
///
/// [`Dataset`]: crate::data::model::Dataset
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("dataset contains no records")]
    Empty,

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("column '{0}' must be numeric")]
    NonNumericColumn(&'static str),

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("record {row}: expected {expected} values, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("record {row}: Attrition must be \"Yes\" or \"No\", found '{value}'")]
    InvalidOutcome { row: usize, value: String },
}

// ---------------------------------------------------------------------------
// Panel errors: one chart cannot be computed, the rest of the page can
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PanelError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' is not numeric")]
    NonNumeric(&'static str),

    #[error("histogram needs at least one bin")]
    InvalidBins,
}
