/// Data layer: schema, loading, metric derivation, filtering and export.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable → WellDataset (schema checked)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  cost metrics per row → DerivedDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  operator / contractor selectors → visible indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  visible rows → .xlsx / .csv bytes
///   └──────────┘
/// ```

pub mod derive;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
