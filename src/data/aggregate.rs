use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::TAU;

use chrono::NaiveDateTime;

use super::model::ObservationRecord;
use super::units::{convert_unit, SizeUnit};

// ---------------------------------------------------------------------------
// Total indicator
// ---------------------------------------------------------------------------

/// Sum of the unit-converted sizes of an already-filtered subset.
pub fn total_size(rows: &[&ObservationRecord], unit: SizeUnit) -> f64 {
    rows.iter().map(|r| convert_unit(r.size_kb, unit).0).sum()
}

// ---------------------------------------------------------------------------
// Per-type breakdown (pie wedges)
// ---------------------------------------------------------------------------

/// One wedge of the proportion chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeShare {
    pub observation_type: String,
    pub size_kb: f64,
    /// Share of the breakdown total, 0–100.
    pub percent: f64,
    /// Wedge span in radians.
    pub angle: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Per-type totals of the filtered subset, restricted to `selected_types`,
/// in lexicographic type order.
///
/// Computed from scratch each call. When every size is zero the wedges keep
/// zero percent and zero angle.
pub fn breakdown_by_type(
    rows: &[&ObservationRecord],
    selected_types: &BTreeSet<String>,
) -> Vec<TypeShare> {
    let mut per_type: BTreeMap<&str, f64> = BTreeMap::new();
    for r in rows {
        if selected_types.contains(&r.observation_type) {
            *per_type.entry(r.observation_type.as_str()).or_insert(0.0) += r.size_kb;
        }
    }

    let total: f64 = per_type.values().sum();
    let mut cursor = 0.0;

    per_type
        .into_iter()
        .map(|(observation_type, size_kb)| {
            let (percent, angle) = if total > 0.0 {
                (100.0 * size_kb / total, TAU * size_kb / total)
            } else {
                (0.0, 0.0)
            };
            let start_angle = cursor;
            cursor += angle;
            TypeShare {
                observation_type: observation_type.to_string(),
                size_kb,
                percent,
                angle,
                start_angle,
                end_angle: cursor,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Time series (line + scatter)
// ---------------------------------------------------------------------------

/// Sizes over time for one (observation type, file type) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub observation_type: String,
    pub file_type: String,
    /// `(observed_at, converted size)` in time order.
    pub points: Vec<(NaiveDateTime, f64)>,
}

impl Series {
    pub fn label(&self) -> String {
        format!("{} ({})", self.observation_type, self.file_type)
    }
}

/// One series per selected type × file combination that has data, ordered
/// by (type, file).
pub fn series_by_combination(
    rows: &[&ObservationRecord],
    observation_types: &BTreeSet<String>,
    file_types: &BTreeSet<String>,
    unit: SizeUnit,
) -> Vec<Series> {
    let mut grouped: BTreeMap<(&str, &str), Vec<(NaiveDateTime, f64)>> = BTreeMap::new();
    for r in rows {
        if observation_types.contains(&r.observation_type) && file_types.contains(&r.file_type) {
            grouped
                .entry((r.observation_type.as_str(), r.file_type.as_str()))
                .or_default()
                .push((r.observed_at, convert_unit(r.size_kb, unit).0));
        }
    }

    grouped
        .into_iter()
        .map(|((observation_type, file_type), mut points)| {
            points.sort_by_key(|(t, _)| *t);
            Series {
                observation_type: observation_type.to_string(),
                file_type: file_type.to_string(),
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{record, ts};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_total_is_linear_in_unit() {
        let rows = vec![
            record(ts(2023, 1, 7, 0), "prepbufr", "gdas", 2048.0),
            record(ts(2023, 1, 7, 6), "gpsro", "gfs", 3000.5),
        ];
        let refs: Vec<&ObservationRecord> = rows.iter().collect();
        let kb = total_size(&refs, SizeUnit::KB);
        let mb = total_size(&refs, SizeUnit::MB);
        assert!((mb * 1024.0 - kb).abs() < 1e-9);
        assert_eq!(kb, 5048.5);
    }

    #[test]
    fn test_total_of_empty_subset_is_zero() {
        assert_eq!(total_size(&[], SizeUnit::GB), 0.0);
    }

    #[test]
    fn test_breakdown_percent_and_angles() {
        let rows = vec![
            record(ts(2023, 1, 7, 0), "prepbufr", "gdas", 300.0),
            record(ts(2023, 1, 7, 6), "gpsro", "gdas", 100.0),
            record(ts(2023, 1, 7, 12), "prepbufr", "gfs", 100.0),
        ];
        let refs: Vec<&ObservationRecord> = rows.iter().collect();
        let wedges = breakdown_by_type(&refs, &set(&["prepbufr", "gpsro"]));

        assert_eq!(wedges.len(), 2);
        assert_eq!(wedges[0].observation_type, "gpsro");
        assert_eq!(wedges[1].observation_type, "prepbufr");
        assert_eq!(wedges[1].size_kb, 400.0);
        assert!((wedges[0].percent - 20.0).abs() < 1e-9);

        let pct: f64 = wedges.iter().map(|w| w.percent).sum();
        let angle: f64 = wedges.iter().map(|w| w.angle).sum();
        assert!((pct - 100.0).abs() < 1e-9);
        assert!((angle - TAU).abs() < 1e-9);
        assert_eq!(wedges[0].start_angle, 0.0);
        assert_eq!(wedges[1].start_angle, wedges[0].end_angle);
        assert!((wedges[1].end_angle - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_drops_unselected_types() {
        let rows = vec![
            record(ts(2023, 1, 7, 0), "prepbufr", "gdas", 300.0),
            record(ts(2023, 1, 7, 0), "gpsro", "gdas", 100.0),
        ];
        let refs: Vec<&ObservationRecord> = rows.iter().collect();
        let wedges = breakdown_by_type(&refs, &set(&["gpsro"]));
        assert_eq!(wedges.len(), 1);
        assert_eq!(wedges[0].percent, 100.0);

        // A second call with a different selection carries nothing over.
        let wedges = breakdown_by_type(&refs, &set(&["prepbufr"]));
        assert_eq!(wedges.len(), 1);
        assert_eq!(wedges[0].observation_type, "prepbufr");
    }

    #[test]
    fn test_breakdown_with_zero_total() {
        let rows = vec![record(ts(2023, 1, 7, 0), "gpsro", "gdas", 0.0)];
        let refs: Vec<&ObservationRecord> = rows.iter().collect();
        let wedges = breakdown_by_type(&refs, &set(&["gpsro"]));
        assert_eq!(wedges.len(), 1);
        assert_eq!(wedges[0].percent, 0.0);
        assert_eq!(wedges[0].angle, 0.0);

        assert!(breakdown_by_type(&refs, &set(&[])).is_empty());
    }

    #[test]
    fn test_series_one_per_combination_in_time_order() {
        let rows = vec![
            record(ts(2023, 1, 8, 0), "prepbufr", "gdas", 2048.0),
            record(ts(2023, 1, 7, 0), "prepbufr", "gdas", 1024.0),
            record(ts(2023, 1, 7, 0), "prepbufr", "gfs", 512.0),
            record(ts(2023, 1, 7, 0), "gpsro", "gdas", 256.0),
        ];
        let refs: Vec<&ObservationRecord> = rows.iter().collect();
        let series = series_by_combination(
            &refs,
            &set(&["prepbufr", "gpsro"]),
            &set(&["gdas", "gfs"]),
            SizeUnit::MB,
        );

        let labels: Vec<String> = series.iter().map(Series::label).collect();
        assert_eq!(
            labels,
            vec!["gpsro (gdas)", "prepbufr (gdas)", "prepbufr (gfs)"]
        );
        assert_eq!(
            series[1].points,
            vec![(ts(2023, 1, 7, 0), 1.0), (ts(2023, 1, 8, 0), 2.0)]
        );
    }
}
