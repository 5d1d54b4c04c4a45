/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ObservationTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ ObservationTable │  Vec<ObservationRecord>, type catalogs
///   └──────────────────┘
///        │   + FilterSelection
///        ▼
///   ┌──────────┐
///   │  filter   │  date → synoptic hour → categories
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────────┐
///   │ aggregate / projection    │  total, wedges, series, table rows
///   └──────────────────────────┘
///        │
///        ▼
///     DashboardView
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;
pub mod units;
pub mod view;
