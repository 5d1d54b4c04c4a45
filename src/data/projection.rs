use std::cmp::Ordering;

use chrono::{NaiveDateTime, TimeDelta};

use super::model::{format_time_lag, ObservationRecord};
use super::units::{convert_unit, SizeUnit};

// ---------------------------------------------------------------------------
// Display rows
// ---------------------------------------------------------------------------

/// A filtered row ready for the table: the stored columns plus the
/// converted size and the formatted lag.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub observed_at: NaiveDateTime,
    pub downloaded_at: NaiveDateTime,
    pub observation_type: String,
    pub file_type: String,
    pub size_kb: f64,
    /// `size_kb` in the selected unit.
    pub size: f64,
    pub time_lag: TimeDelta,
    pub time_lag_display: String,
}

/// Project the filtered subset into table rows. Order is preserved.
pub fn project_table(rows: &[&ObservationRecord], unit: SizeUnit) -> Vec<DisplayRow> {
    rows.iter()
        .map(|r| DisplayRow {
            observed_at: r.observed_at,
            downloaded_at: r.downloaded_at,
            observation_type: r.observation_type.clone(),
            file_type: r.file_type.clone(),
            size_kb: r.size_kb,
            size: convert_unit(r.size_kb, unit).0,
            time_lag: r.time_lag,
            time_lag_display: format_time_lag(r.time_lag),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    ObservedAt,
    DownloadedAt,
    ObservationType,
    FileType,
    Size,
    TimeLag,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::ObservedAt,
        SortColumn::DownloadedAt,
        SortColumn::ObservationType,
        SortColumn::FileType,
        SortColumn::Size,
        SortColumn::TimeLag,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Current sort of the table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl TableSort {
    /// Clicking the active column flips the direction; another column
    /// starts ascending.
    pub fn toggled(self, column: SortColumn) -> Self {
        if self.column == column {
            let direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
            TableSort { column, direction }
        } else {
            TableSort {
                column,
                direction: SortDirection::Ascending,
            }
        }
    }
}

fn compare(a: &DisplayRow, b: &DisplayRow, column: SortColumn) -> Ordering {
    match column {
        SortColumn::ObservedAt => a.observed_at.cmp(&b.observed_at),
        SortColumn::DownloadedAt => a.downloaded_at.cmp(&b.downloaded_at),
        SortColumn::ObservationType => a.observation_type.cmp(&b.observation_type),
        SortColumn::FileType => a.file_type.cmp(&b.file_type),
        SortColumn::Size => a.size_kb.total_cmp(&b.size_kb),
        SortColumn::TimeLag => a.time_lag.cmp(&b.time_lag),
    }
}

/// Stable sort of the table rows.
pub fn sort_rows(rows: &mut [DisplayRow], sort: TableSort) {
    rows.sort_by(|a, b| {
        let ord = compare(a, b, sort.column);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
