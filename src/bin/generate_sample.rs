use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use parquet::arrow::ArrowWriter;

const CSV_PATH: &str = "sample_obs.csv";
const PARQUET_PATH: &str = "sample_obs.parquet";
const DAYS: i64 = 90;

/// Observation types with a typical gdas file size in KB.
const OBSERVATION_TYPES: &[(&str, f64)] = &[
    ("1bamua", 28_000.0),
    ("1bhrs4", 9_500.0),
    ("airsev", 41_000.0),
    ("atms", 62_000.0),
    ("crisf4", 180_000.0),
    ("eshrs3", 1_200.0),
    ("esmhs", 22_000.0),
    ("gome", 3_400.0),
    ("gpsipw", 800.0),
    ("gpsro", 5_600.0),
    ("mtiasi", 240_000.0),
    ("osbuv8", 450.0),
    ("prepbufr", 48_000.0),
    ("satwnd", 96_000.0),
    ("sevcsr", 7_800.0),
];

/// gfs files are cut earlier and carry fewer observations.
const FILE_TYPES: &[(&str, f64, i64)] = &[("gdas", 1.0, 75), ("gfs", 0.8, 20)];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

struct Row {
    downloaded_at: NaiveDateTime,
    observed_at: NaiveDateTime,
    observation_type: &'static str,
    file_type: &'static str,
    size_kb: f64,
}

fn generate_rows(rng: &mut SimpleRng) -> Result<Vec<Row>> {
    let first_day = NaiveDate::from_ymd_opt(2023, 1, 1)
        .context("invalid start date")?
        .and_hms_opt(0, 0, 0)
        .context("invalid start time")?;

    let mut rows = Vec::new();
    for day in 0..DAYS {
        for cycle in [0, 6, 12, 18] {
            let observed_at = first_day + TimeDelta::days(day) + TimeDelta::hours(cycle);
            for &(file_type, scale, max_lag_min) in FILE_TYPES {
                for &(observation_type, base_kb) in OBSERVATION_TYPES {
                    // About 2% of files never made it to disk.
                    if rng.next_f64() < 0.02 {
                        continue;
                    }
                    let lag_min = (rng.next_f64() * max_lag_min as f64) as i64;
                    let jitter = 0.85 + 0.3 * rng.next_f64();
                    rows.push(Row {
                        downloaded_at: observed_at
                            + TimeDelta::hours(3)
                            + TimeDelta::minutes(lag_min)
                            + TimeDelta::seconds((rng.next_f64() * 60.0) as i64),
                        observed_at,
                        observation_type,
                        file_type,
                        size_kb: (base_kb * scale * jitter).round(),
                    });
                }
            }
        }
    }
    Ok(rows)
}

fn write_csv(rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    writer.write_record([
        "Data do Download",
        "Data da Observação",
        "Tipo de Observação",
        "Tipo de Arquivo",
        "Tamanho do Download (KB)",
    ])?;
    for row in rows {
        writer.write_record([
            row.downloaded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.observed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.observation_type.to_string(),
            row.file_type.to_string(),
            row.size_kb.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row]) -> Result<()> {
    let millis = |t: &NaiveDateTime| t.and_utc().timestamp_millis();

    let downloaded = TimestampMillisecondArray::from(
        rows.iter().map(|r| millis(&r.downloaded_at)).collect::<Vec<_>>(),
    );
    let observed = TimestampMillisecondArray::from(
        rows.iter().map(|r| millis(&r.observed_at)).collect::<Vec<_>>(),
    );
    let otypes = StringArray::from(rows.iter().map(|r| r.observation_type).collect::<Vec<_>>());
    let ftypes = StringArray::from(rows.iter().map(|r| r.file_type).collect::<Vec<_>>());
    let sizes = Float64Array::from(rows.iter().map(|r| r.size_kb).collect::<Vec<_>>());

    let timestamp = DataType::Timestamp(TimeUnit::Millisecond, None);
    let schema = Arc::new(Schema::new(vec![
        Field::new("Data do Download", timestamp.clone(), false),
        Field::new("Data da Observação", timestamp, false),
        Field::new("Tipo de Observação", DataType::Utf8, false),
        Field::new("Tipo de Arquivo", DataType::Utf8, false),
        Field::new("Tamanho do Download (KB)", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(downloaded),
            Arc::new(observed),
            Arc::new(otypes),
            Arc::new(ftypes),
            Arc::new(sizes),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng)?;

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!(
        "Wrote {} observation files ({} days, {} types) to {CSV_PATH} and {PARQUET_PATH}",
        rows.len(),
        DAYS,
        OBSERVATION_TYPES.len()
    );
    Ok(())
}
