use std::collections::BTreeSet;

use chrono::{NaiveDateTime, TimeDelta};

// ---------------------------------------------------------------------------
// Column names of the monitoring table
// ---------------------------------------------------------------------------

pub const COL_DOWNLOADED_AT: &str = "Data do Download";
pub const COL_OBSERVED_AT: &str = "Data da Observação";
pub const COL_OBSERVATION_TYPE: &str = "Tipo de Observação";
pub const COL_FILE_TYPE: &str = "Tipo de Arquivo";
pub const COL_SIZE_KB: &str = "Tamanho do Download (KB)";

/// Files are published three hours after the nominal cycle time.
pub const PUBLICATION_DELAY_HOURS: i64 = 3;

// ---------------------------------------------------------------------------
// ObservationRecord – one row of the table
// ---------------------------------------------------------------------------

/// One downloaded observation file.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    /// Nominal analysis cycle time (00/06/12/18 UTC in practice).
    pub observed_at: NaiveDateTime,
    /// When the file landed on disk.
    pub downloaded_at: NaiveDateTime,
    pub observation_type: String,
    pub file_type: String,
    /// Size in kilobytes; every other unit is derived from this.
    pub size_kb: f64,
    /// `downloaded_at - observed_at - 3h`. May be negative.
    pub time_lag: TimeDelta,
}

impl ObservationRecord {
    pub fn new(
        observed_at: NaiveDateTime,
        downloaded_at: NaiveDateTime,
        observation_type: impl Into<String>,
        file_type: impl Into<String>,
        size_kb: f64,
    ) -> Self {
        let time_lag =
            (downloaded_at - observed_at) - TimeDelta::hours(PUBLICATION_DELAY_HOURS);
        Self {
            observed_at,
            downloaded_at,
            observation_type: observation_type.into(),
            file_type: file_type.into(),
            size_kb,
            time_lag,
        }
    }
}

/// Render a duration the way pandas prints a `Timedelta`:
/// `"%d days %H:%M:%S"`, with days floored so negative lags read
/// `-1 days 23:00:00`.
pub fn format_time_lag(lag: TimeDelta) -> String {
    let total = lag.num_milliseconds().div_euclid(1_000);
    let days = total.div_euclid(86_400);
    let rem = total.rem_euclid(86_400);
    format!(
        "{days} days {:02}:{:02}:{:02}",
        rem / 3_600,
        (rem % 3_600) / 60,
        rem % 60
    )
}

// ---------------------------------------------------------------------------
// ObservationTable – the loaded snapshot
// ---------------------------------------------------------------------------

/// The full loaded table. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    records: Vec<ObservationRecord>,
    /// Sorted distinct observation types.
    pub observation_types: BTreeSet<String>,
    /// Sorted distinct file types.
    pub file_types: BTreeSet<String>,
    /// Earliest and latest `observed_at`, if any rows exist.
    pub observed_bounds: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl ObservationTable {
    /// Build the catalogs from the loaded records.
    pub fn from_records(records: Vec<ObservationRecord>) -> Self {
        let mut observation_types = BTreeSet::new();
        let mut file_types = BTreeSet::new();
        let mut observed_bounds: Option<(NaiveDateTime, NaiveDateTime)> = None;

        for rec in &records {
            observation_types.insert(rec.observation_type.clone());
            file_types.insert(rec.file_type.clone());
            observed_bounds = Some(match observed_bounds {
                None => (rec.observed_at, rec.observed_at),
                Some((lo, hi)) => (lo.min(rec.observed_at), hi.max(rec.observed_at)),
            });
        }

        ObservationTable {
            records,
            observation_types,
            file_types,
            observed_bounds,
        }
    }

    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
