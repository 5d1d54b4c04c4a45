use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::color::ColorMap;
use crate::config::Settings;
use crate::data::filter::{FilterSelection, SynopticHours};
use crate::data::model::ObservationTable;
use crate::data::projection::{SortColumn, TableSort};
use crate::data::units::SizeUnit;
use crate::data::view::DashboardView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which presentation fills the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Charts,
    Table,
}

/// Which categorical filter a widget edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    ObservationType,
    FileType,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until a file is loaded).
    pub table: Option<ObservationTable>,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Date pickers work on whole days; the selection gets the timestamps.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Derived outputs for the current selection (recomputed on change).
    pub view: DashboardView,

    /// Table ordering.
    pub sort: TableSort,

    /// Colour per observation type.
    pub color_map: Option<ColorMap>,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| start_of_day(date))
}

/// Pick the configured values that exist in the catalog, or fall back to
/// the first catalog entry.
fn initial_selection(wanted: &[String], available: &BTreeSet<String>) -> BTreeSet<String> {
    let picked: BTreeSet<String> = wanted
        .iter()
        .filter(|v| available.contains(*v))
        .cloned()
        .collect();
    if picked.is_empty() {
        available.iter().next().cloned().into_iter().collect()
    } else {
        picked
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let today = chrono::Utc::now().date_naive();
        let start_date = settings.start.unwrap_or(today);
        let end_date = settings.end.unwrap_or(today);
        let selection = FilterSelection {
            start: start_of_day(start_date),
            end: end_of_day(end_date),
            hours: settings.synoptic_hours,
            observation_types: BTreeSet::new(),
            file_types: BTreeSet::new(),
            unit: settings.unit,
        };

        Self {
            table: None,
            selection,
            start_date,
            end_date,
            view: DashboardView::default(),
            sort: TableSort::default(),
            color_map: None,
            tab: Tab::default(),
            status_message: None,
            settings,
        }
    }

    /// Ingest a newly loaded table, seed the filters and compute the view.
    pub fn set_table(&mut self, table: ObservationTable) {
        let bounds = table.observed_bounds.map(|(lo, hi)| (lo.date(), hi.date()));
        if let Some((lo, hi)) = bounds {
            self.start_date = self.settings.start.unwrap_or(lo);
            self.end_date = self.settings.end.unwrap_or(hi);
        }
        self.selection.start = start_of_day(self.start_date);
        self.selection.end = end_of_day(self.end_date);
        self.selection.observation_types =
            initial_selection(&self.settings.observation_types, &table.observation_types);
        self.selection.file_types =
            initial_selection(&self.settings.file_types, &table.file_types);

        self.color_map = Some(ColorMap::new(&table.observation_types));
        self.table = Some(table);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute every presentation from the current selection.
    pub fn refresh(&mut self) {
        if let Some(table) = &self.table {
            self.view = DashboardView::compute(table, &self.selection, self.sort);
            log::debug!(
                "Selection matched {} of {} rows, total {:.2} {}",
                self.view.row_count,
                table.len(),
                self.view.total,
                self.view.unit
            );
        }
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start_date = start;
        self.end_date = end;
        self.selection.start = start_of_day(start);
        self.selection.end = end_of_day(end);
        self.refresh();
    }

    pub fn set_hours(&mut self, hours: SynopticHours) {
        self.selection.hours = hours;
        self.refresh();
    }

    pub fn set_unit(&mut self, unit: SizeUnit) {
        self.selection.unit = unit;
        self.refresh();
    }

    fn selected_mut(&mut self, category: Category) -> &mut BTreeSet<String> {
        match category {
            Category::ObservationType => &mut self.selection.observation_types,
            Category::FileType => &mut self.selection.file_types,
        }
    }

    /// Toggle a single value in a categorical filter.
    pub fn toggle(&mut self, category: Category, value: &str) {
        let selected = self.selected_mut(category);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refresh();
    }

    /// Select every value the table has for a category.
    pub fn select_all(&mut self, category: Category) {
        let all = match (&self.table, category) {
            (Some(t), Category::ObservationType) => t.observation_types.clone(),
            (Some(t), Category::FileType) => t.file_types.clone(),
            (None, _) => return,
        };
        *self.selected_mut(category) = all;
        self.refresh();
    }

    /// Deselect all values of a category.
    pub fn select_none(&mut self, category: Category) {
        self.selected_mut(category).clear();
        self.refresh();
    }

    /// Sort the table by `column`, flipping direction on repeat clicks.
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = self.sort.toggled(column);
        self.view.resort(self.sort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{record, ts};
    use crate::data::projection::SortDirection;

    fn table() -> ObservationTable {
        ObservationTable::from_records(vec![
            record(ts(2023, 1, 7, 0), "prepbufr", "gdas", 2048.0),
            record(ts(2023, 1, 7, 12), "gpsro", "gdas", 1024.0),
            record(ts(2023, 1, 8, 0), "gpsro", "gfs", 512.0),
        ])
    }

    #[test]
    fn test_set_table_seeds_first_values_and_bounds() {
        let mut state = AppState::default();
        state.set_table(table());

        assert_eq!(state.start_date, NaiveDate::from_ymd_opt(2023, 1, 7).unwrap());
        assert_eq!(state.end_date, NaiveDate::from_ymd_opt(2023, 1, 8).unwrap());
        assert_eq!(
            state.selection.observation_types.iter().collect::<Vec<_>>(),
            vec!["gpsro"]
        );
        assert_eq!(
            state.selection.file_types.iter().collect::<Vec<_>>(),
            vec!["gdas"]
        );
        // 00Z only: the gpsro/gdas row is at 12Z.
        assert_eq!(state.view.row_count, 0);
    }

    #[test]
    fn test_settings_preselect_values() {
        let settings = Settings {
            unit: SizeUnit::MB,
            synoptic_hours: SynopticHours::All,
            observation_types: vec!["prepbufr".into(), "unknown".into()],
            file_types: vec!["gdas".into()],
            ..Settings::default()
        };
        let mut state = AppState::new(settings);
        state.set_table(table());

        assert_eq!(state.view.row_count, 1);
        assert!((state.view.total - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_interactions_recompute_view() {
        let mut state = AppState::default();
        state.set_table(table());
        state.set_hours(SynopticHours::All);
        state.select_all(Category::FileType);
        assert_eq!(state.view.row_count, 2);

        state.toggle(Category::ObservationType, "prepbufr");
        assert_eq!(state.view.row_count, 3);
        assert_eq!(state.view.breakdown.len(), 2);

        state.select_none(Category::ObservationType);
        assert_eq!(state.view.row_count, 0);
        assert_eq!(state.view.total, 0.0);

        state.select_all(Category::ObservationType);
        state.set_date_range(
            NaiveDate::from_ymd_opt(2023, 1, 8).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 8).unwrap(),
        );
        assert_eq!(state.view.row_count, 1);

        state.set_unit(SizeUnit::KB);
        assert_eq!(state.view.total, 512.0);
    }

    #[test]
    fn test_inverted_dates_give_empty_view() {
        let mut state = AppState::default();
        state.set_table(table());
        state.set_date_range(
            NaiveDate::from_ymd_opt(2023, 1, 8).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        );
        assert_eq!(state.view.row_count, 0);
    }

    #[test]
    fn test_sort_by_flips_direction() {
        let mut state = AppState::default();
        state.set_table(table());
        state.set_hours(SynopticHours::All);
        state.select_all(Category::ObservationType);
        state.select_all(Category::FileType);

        state.sort_by(SortColumn::Size);
        assert_eq!(state.view.rows[0].size_kb, 512.0);
        state.sort_by(SortColumn::Size);
        assert_eq!(state.sort.direction, SortDirection::Descending);
        assert_eq!(state.view.rows[0].size_kb, 2048.0);

        // The sort survives a recompute.
        state.set_unit(SizeUnit::GB);
        assert_eq!(state.view.rows[0].size_kb, 2048.0);
    }
}
