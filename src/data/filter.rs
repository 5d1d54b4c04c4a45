use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::model::{ObservationRecord, ObservationTable};
use super::units::SizeUnit;

// ---------------------------------------------------------------------------
// Synoptic hour selections
// ---------------------------------------------------------------------------

/// The hour combinations offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SynopticHours {
    #[default]
    #[serde(rename = "00Z")]
    H00,
    #[serde(rename = "06Z")]
    H06,
    #[serde(rename = "12Z")]
    H12,
    #[serde(rename = "18Z")]
    H18,
    #[serde(rename = "00Z+12Z")]
    H00And12,
    #[serde(rename = "06Z+18Z")]
    H06And18,
    #[serde(rename = "00Z+06Z+12Z+18Z")]
    All,
}

impl SynopticHours {
    pub const ALL: [SynopticHours; 7] = [
        SynopticHours::H00,
        SynopticHours::H06,
        SynopticHours::H12,
        SynopticHours::H18,
        SynopticHours::H00And12,
        SynopticHours::H06And18,
        SynopticHours::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SynopticHours::H00 => "00Z",
            SynopticHours::H06 => "06Z",
            SynopticHours::H12 => "12Z",
            SynopticHours::H18 => "18Z",
            SynopticHours::H00And12 => "00Z+12Z",
            SynopticHours::H06And18 => "06Z+18Z",
            SynopticHours::All => "00Z+06Z+12Z+18Z",
        }
    }

    /// Whether a cycle time-of-day belongs to this selection.
    ///
    /// Single and paired hours match `HH:00:00` exactly. The four-hour
    /// selection keeps everything from 00:00:00 through 18:00:00.
    pub fn matches(self, time: NaiveTime) -> bool {
        let on_the_hour = time.minute() == 0 && time.second() == 0 && time.nanosecond() == 0;
        match self {
            SynopticHours::H00 => on_the_hour && time.hour() == 0,
            SynopticHours::H06 => on_the_hour && time.hour() == 6,
            SynopticHours::H12 => on_the_hour && time.hour() == 12,
            SynopticHours::H18 => on_the_hour && time.hour() == 18,
            SynopticHours::H00And12 => on_the_hour && matches!(time.hour(), 0 | 12),
            SynopticHours::H06And18 => on_the_hour && matches!(time.hour(), 6 | 18),
            SynopticHours::All => time.hour() < 18 || (time.hour() == 18 && on_the_hour),
        }
    }
}

impl fmt::Display for SynopticHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SynopticHours {
    type Err = String;

    /// Accepts the dashboard labels (`00Z+12Z`) and the monitoring sheet's
    /// labels (`00Z e 12Z`, `00Z, 06Z, 12Z e 18Z`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .replace(" e ", "+")
            .replace(',', "+")
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("+");

        SynopticHours::ALL
            .into_iter()
            .find(|h| h.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("unknown synoptic hour selection '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – one query's worth of widget state
// ---------------------------------------------------------------------------

/// Everything the user picked. Rebuilt on every interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    /// Inclusive lower bound on `observed_at`.
    pub start: NaiveDateTime,
    /// Inclusive upper bound on `observed_at`.
    pub end: NaiveDateTime,
    pub hours: SynopticHours,
    pub observation_types: BTreeSet<String>,
    pub file_types: BTreeSet<String>,
    pub unit: SizeUnit,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            start: NaiveDateTime::MIN,
            end: NaiveDateTime::MAX,
            hours: SynopticHours::default(),
            observation_types: BTreeSet::new(),
            file_types: BTreeSet::new(),
            unit: SizeUnit::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter stages
// ---------------------------------------------------------------------------

/// Rows with `start <= observed_at <= end`. An inverted range is empty.
pub fn filter_by_date_range<'a>(
    rows: &[&'a ObservationRecord],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<&'a ObservationRecord> {
    if start > end {
        return Vec::new();
    }
    rows.iter()
        .copied()
        .filter(|r| start <= r.observed_at && r.observed_at <= end)
        .collect()
}

/// Rows whose cycle time-of-day belongs to `hours`.
pub fn filter_by_synoptic_hour<'a>(
    rows: &[&'a ObservationRecord],
    hours: SynopticHours,
) -> Vec<&'a ObservationRecord> {
    rows.iter()
        .copied()
        .filter(|r| hours.matches(r.observed_at.time()))
        .collect()
}

/// Rows whose observation type AND file type are both selected.
/// An empty set on either side selects nothing.
pub fn filter_by_categories<'a>(
    rows: &[&'a ObservationRecord],
    observation_types: &BTreeSet<String>,
    file_types: &BTreeSet<String>,
) -> Vec<&'a ObservationRecord> {
    rows.iter()
        .copied()
        .filter(|r| {
            observation_types.contains(&r.observation_type) && file_types.contains(&r.file_type)
        })
        .collect()
}

/// Date → hour → category, in table order. The single filtering pass every
/// presentation consumes.
pub fn apply_filters<'a>(
    table: &'a ObservationTable,
    selection: &FilterSelection,
) -> Vec<&'a ObservationRecord> {
    let all: Vec<&ObservationRecord> = table.records().iter().collect();
    let in_window = filter_by_date_range(&all, selection.start, selection.end);
    let in_cycle = filter_by_synoptic_hour(&in_window, selection.hours);
    filter_by_categories(
        &in_cycle,
        &selection.observation_types,
        &selection.file_types,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{record, ts};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn four_cycles() -> Vec<ObservationRecord> {
        let mut rows = Vec::new();
        for day in 1..=3 {
            for hour in [0, 6, 12, 18] {
                rows.push(record(ts(2023, 2, day, hour), "prepbufr", "gdas", 100.0));
            }
        }
        rows
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let rows = four_cycles();
        let refs: Vec<&ObservationRecord> = rows.iter().collect();
        let start = ts(2023, 2, 1, 6);
        let end = ts(2023, 2, 2, 6);
        let out = filter_by_date_range(&refs, start, end);
        assert_eq!(out.len(), 5);
        assert!(out
            .iter()
            .all(|r| start <= r.observed_at && r.observed_at <= end));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let rows = four_cycles();
        let refs: Vec<&ObservationRecord> = rows.iter().collect();
        let out = filter_by_date_range(&refs, ts(2023, 2, 3, 0), ts(2023, 2, 1, 0));
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_hour_exact_match() {
        let mut rows = four_cycles();
        rows.push(record(
            ts(2023, 2, 1, 0) + chrono::TimeDelta::minutes(30),
            "prepbufr",
            "gdas",
            1.0,
        ));
        let refs: Vec<&ObservationRecord> = rows.iter().collect();
        let out = filter_by_synoptic_hour(&refs, SynopticHours::H00);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| r.observed_at.time() == NaiveTime::MIN));
    }

    #[test]
    fn test_paired_hours_skip_midpoint() {
        let rows = four_cycles();
        let refs: Vec<&ObservationRecord> = rows.iter().collect();
        let out = filter_by_synoptic_hour(&refs, SynopticHours::H00And12);
        assert_eq!(out.len(), 6);
        assert!(out
            .iter()
            .all(|r| matches!(r.observed_at.hour(), 0 | 12)));

        let out = filter_by_synoptic_hour(&refs, SynopticHours::H06And18);
        assert!(out.iter().all(|r| matches!(r.observed_at.hour(), 6 | 18)));
    }

    #[test]
    fn test_combined_selections_cover_single_hours() {
        let rows = four_cycles();
        let refs: Vec<&ObservationRecord> = rows.iter().collect();

        let singles: usize = [
            SynopticHours::H00,
            SynopticHours::H06,
            SynopticHours::H12,
            SynopticHours::H18,
        ]
        .into_iter()
        .map(|h| filter_by_synoptic_hour(&refs, h).len())
        .sum();

        let pairs = filter_by_synoptic_hour(&refs, SynopticHours::H00And12).len()
            + filter_by_synoptic_hour(&refs, SynopticHours::H06And18).len();
        let all = filter_by_synoptic_hour(&refs, SynopticHours::All).len();

        assert_eq!(singles, rows.len());
        assert_eq!(pairs, singles);
        assert_eq!(all, singles);
    }

    #[test]
    fn test_all_hours_range_stops_at_18z() {
        assert!(SynopticHours::All.matches(NaiveTime::from_hms_opt(18, 0, 0).unwrap()));
        assert!(SynopticHours::All.matches(NaiveTime::from_hms_opt(3, 15, 0).unwrap()));
        assert!(!SynopticHours::All.matches(NaiveTime::from_hms_opt(18, 0, 1).unwrap()));
        assert!(!SynopticHours::All.matches(NaiveTime::from_hms_opt(21, 0, 0).unwrap()));
    }

    #[test]
    fn test_categories_require_both_sets() {
        let rows = vec![
            record(ts(2023, 2, 1, 0), "prepbufr", "gdas", 1.0),
            record(ts(2023, 2, 1, 0), "prepbufr", "gfs", 1.0),
            record(ts(2023, 2, 1, 0), "gpsro", "gdas", 1.0),
        ];
        let refs: Vec<&ObservationRecord> = rows.iter().collect();

        let out = filter_by_categories(&refs, &set(&["prepbufr"]), &set(&["gdas"]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].file_type, "gdas");

        assert!(filter_by_categories(&refs, &set(&[]), &set(&["gdas"])).is_empty());
        assert!(filter_by_categories(&refs, &set(&["prepbufr"]), &set(&[])).is_empty());
    }

    #[test]
    fn test_apply_filters_composes_stages() {
        let table = ObservationTable::from_records(vec![
            record(ts(2023, 1, 7, 0), "prepbufr", "gdas", 2048.0),
            record(ts(2023, 1, 7, 12), "gpsro", "gdas", 1024.0),
            record(ts(2024, 1, 7, 0), "prepbufr", "gdas", 4096.0),
        ]);
        let selection = FilterSelection {
            start: ts(2023, 1, 1, 0),
            end: ts(2023, 12, 31, 0),
            hours: SynopticHours::H00,
            observation_types: set(&["prepbufr", "gpsro"]),
            file_types: set(&["gdas"]),
            unit: SizeUnit::MB,
        };
        let out = apply_filters(&table, &selection);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].size_kb, 2048.0);
    }

    #[test]
    fn test_parse_hour_labels() {
        assert_eq!("06Z".parse::<SynopticHours>(), Ok(SynopticHours::H06));
        assert_eq!(
            "00Z e 12Z".parse::<SynopticHours>(),
            Ok(SynopticHours::H00And12)
        );
        assert_eq!(
            "00Z, 06Z, 12Z e 18Z".parse::<SynopticHours>(),
            Ok(SynopticHours::All)
        );
        assert!("00Z e 06Z".parse::<SynopticHours>().is_err());
    }
}
