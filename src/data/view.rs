use super::aggregate::{breakdown_by_type, series_by_combination, total_size, Series, TypeShare};
use super::filter::{apply_filters, FilterSelection};
use super::model::ObservationTable;
use super::projection::{project_table, sort_rows, DisplayRow, TableSort};
use super::units::{SizeUnit, UnitLabels};

// ---------------------------------------------------------------------------
// DashboardView – everything the presentations need for one interaction
// ---------------------------------------------------------------------------

/// Output of one filter pass, shared by the indicator, the table, the time
/// series and the pie chart.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub unit: SizeUnit,
    /// Rows matching the selection.
    pub row_count: usize,
    /// Total size of the matching rows in `unit`.
    pub total: f64,
    pub rows: Vec<DisplayRow>,
    pub series: Vec<Series>,
    pub breakdown: Vec<TypeShare>,
}

impl DashboardView {
    /// Filter once, then derive every presentation from that subset.
    pub fn compute(table: &ObservationTable, selection: &FilterSelection, sort: TableSort) -> Self {
        let subset = apply_filters(table, selection);

        let mut rows = project_table(&subset, selection.unit);
        sort_rows(&mut rows, sort);

        DashboardView {
            unit: selection.unit,
            row_count: subset.len(),
            total: total_size(&subset, selection.unit),
            rows,
            series: series_by_combination(
                &subset,
                &selection.observation_types,
                &selection.file_types,
                selection.unit,
            ),
            breakdown: breakdown_by_type(&subset, &selection.observation_types),
        }
    }

    pub fn labels(&self) -> &'static UnitLabels {
        self.unit.labels()
    }

    /// Re-sort the table rows without recomputing the rest.
    pub fn resort(&mut self, sort: TableSort) {
        sort_rows(&mut self.rows, sort);
    }
}
