/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ LaunchTable  │  Vec<LaunchRecord>, site index, payload bounds
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site + payload predicates → pie / scatter input
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;

use thiserror::Error;

/// Schema-level problems with a launch table source.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        column: &'static str,
        found: String,
        expected: &'static str,
    },
    #[error("class must be 0 or 1, got {0}")]
    InvalidClass(i64),
    #[error("null value in column '{0}'")]
    NullValue(&'static str),
}
