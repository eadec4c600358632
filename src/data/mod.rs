/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → rows of CellValue
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  schema validated once, Vec<Record>, filter values
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView (row indices)
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub mod fixtures;
