use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    ObservationRecord, ObservationTable, COL_DOWNLOADED_AT, COL_FILE_TYPE, COL_OBSERVATION_TYPE,
    COL_OBSERVED_AT, COL_SIZE_KB,
};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the observation table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the monitoring sheet as exported by the download scripts
/// * `.json`    – `[{ "Data do Download": "...", ... }, ...]`
/// * `.parquet` – same columns; dates as strings or native timestamps
pub fn load_file(path: &Path) -> Result<ObservationTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} observation files from {} ({} observation types, {} file types)",
        table.len(),
        path.display(),
        table.observation_types.len(),
        table.file_types.len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp cell. A bare date means midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

fn timestamp_cell(value: &str, row: usize, column: &'static str) -> Result<NaiveDateTime, LoadError> {
    parse_timestamp(value).ok_or_else(|| LoadError::InvalidTimestamp {
        row,
        column,
        value: value.to_string(),
    })
}

fn size_cell(value: &str, row: usize) -> Result<f64, LoadError> {
    value.trim().parse::<f64>().map_err(|_| LoadError::InvalidSize {
        row,
        value: value.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the five monitoring columns, in any order.
/// Extra columns (e.g. a pandas index) are ignored.
fn load_csv(path: &Path) -> Result<ObservationTable, LoadError> {
    let reader = csv::Reader::from_path(path)?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<ObservationTable, LoadError> {
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let find_column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let downloaded_idx = find_column(COL_DOWNLOADED_AT)?;
    let observed_idx = find_column(COL_OBSERVED_AT)?;
    let otype_idx = find_column(COL_OBSERVATION_TYPE)?;
    let ftype_idx = find_column(COL_FILE_TYPE)?;
    let size_idx = find_column(COL_SIZE_KB)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let downloaded_at = timestamp_cell(cell(downloaded_idx), row_no, COL_DOWNLOADED_AT)?;
        let observed_at = timestamp_cell(cell(observed_idx), row_no, COL_OBSERVED_AT)?;
        let size_kb = size_cell(cell(size_idx), row_no)?;

        records.push(ObservationRecord::new(
            observed_at,
            downloaded_at,
            cell(otype_idx).trim(),
            cell(ftype_idx).trim(),
            size_kb,
        ));
    }

    Ok(ObservationTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records',
/// date_format='iso')`):
///
/// ```json
/// [
///   {
///     "Data do Download": "2023-01-07 03:41:10",
///     "Data da Observação": "2023-01-07 00:00:00",
///     "Tipo de Observação": "prepbufr",
///     "Tipo de Arquivo": "gdas",
///     "Tamanho do Download (KB)": 2048.0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ObservationTable, LoadError> {
    let text = std::fs::read_to_string(path)?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<ObservationTable, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or(LoadError::NotAnObject(i))?;

        let field = |name: &'static str| match obj.get(name) {
            None => Err(LoadError::MissingColumn(name)),
            Some(JsonValue::Null) => Err(LoadError::NullValue { row: i, column: name }),
            Some(v) => Ok(v),
        };

        let downloaded_at = json_timestamp(field(COL_DOWNLOADED_AT)?, i, COL_DOWNLOADED_AT)?;
        let observed_at = json_timestamp(field(COL_OBSERVED_AT)?, i, COL_OBSERVED_AT)?;
        let observation_type = json_text(field(COL_OBSERVATION_TYPE)?);
        let file_type = json_text(field(COL_FILE_TYPE)?);
        let size_kb = match field(COL_SIZE_KB)? {
            JsonValue::Number(n) => n.as_f64().ok_or_else(|| LoadError::InvalidSize {
                row: i,
                value: n.to_string(),
            })?,
            JsonValue::String(s) => size_cell(s, i)?,
            other => {
                return Err(LoadError::InvalidSize {
                    row: i,
                    value: other.to_string(),
                })
            }
        };

        records.push(ObservationRecord::new(
            observed_at,
            downloaded_at,
            observation_type,
            file_type,
            size_kb,
        ));
    }

    Ok(ObservationTable::from_records(records))
}

/// Strings are parsed; integers are epoch milliseconds (pandas' default
/// `date_format='epoch'`).
fn json_timestamp(val: &JsonValue, row: usize, column: &'static str) -> Result<NaiveDateTime, LoadError> {
    match val {
        JsonValue::String(s) => timestamp_cell(s, row, column),
        JsonValue::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| LoadError::InvalidTimestamp {
                row,
                column,
                value: n.to_string(),
            }),
        other => Err(LoadError::InvalidTimestamp {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

fn json_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by pandas (`df.to_parquet()`) or by the
/// sample generator.
///
/// Expected schema:
/// - date columns: Utf8 / LargeUtf8 strings, or Timestamp of any unit
/// - type columns: Utf8 / LargeUtf8
/// - size column: any numeric type
fn load_parquet(path: &Path) -> Result<ObservationTable, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    // A file without row groups yields no batches, so check the schema up front.
    let schema = builder.schema();
    for name in REQUIRED_COLUMNS {
        schema
            .index_of(name)
            .map_err(|_| LoadError::MissingColumn(name))?;
    }
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let offset = records.len();

        let downloaded = timestamp_column(&batch, COL_DOWNLOADED_AT, offset)?;
        let observed = timestamp_column(&batch, COL_OBSERVED_AT, offset)?;
        let otypes = string_column(&batch, COL_OBSERVATION_TYPE)?;
        let ftypes = string_column(&batch, COL_FILE_TYPE)?;
        let sizes = float_column(&batch, COL_SIZE_KB)?;

        for row in 0..batch.num_rows() {
            let abs_row = offset + row;
            for (array, name) in [
                (&otypes, COL_OBSERVATION_TYPE),
                (&ftypes, COL_FILE_TYPE),
            ] {
                if array.is_null(row) {
                    return Err(LoadError::NullValue {
                        row: abs_row,
                        column: name,
                    });
                }
            }
            if sizes.is_null(row) {
                return Err(LoadError::NullValue {
                    row: abs_row,
                    column: COL_SIZE_KB,
                });
            }

            records.push(ObservationRecord::new(
                observed[row],
                downloaded[row],
                otypes.value(row).trim(),
                ftypes.value(row).trim(),
                sizes.value(row),
            ));
        }
    }

    Ok(ObservationTable::from_records(records))
}

// -- Parquet / Arrow helpers --

const REQUIRED_COLUMNS: [&str; 5] = [
    COL_DOWNLOADED_AT,
    COL_OBSERVED_AT,
    COL_OBSERVATION_TYPE,
    COL_FILE_TYPE,
    COL_SIZE_KB,
];

fn column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a Arc<dyn Array>, LoadError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| LoadError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

/// Cast a column to `Utf8` and hand back the concrete array.
fn string_column(batch: &RecordBatch, name: &'static str) -> Result<StringArray, LoadError> {
    let casted = cast(column(batch, name)?, &DataType::Utf8)?;
    casted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| LoadError::UnexpectedColumnType {
            column: name,
            data_type: format!("{:?}", casted.data_type()),
        })
}

fn float_column(batch: &RecordBatch, name: &'static str) -> Result<Float64Array, LoadError> {
    let casted = cast(column(batch, name)?, &DataType::Float64)?;
    casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| LoadError::UnexpectedColumnType {
            column: name,
            data_type: format!("{:?}", casted.data_type()),
        })
}

fn timestamp_column(
    batch: &RecordBatch,
    name: &'static str,
    offset: usize,
) -> Result<Vec<NaiveDateTime>, LoadError> {
    let col = column(batch, name)?;

    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let strings = string_column(batch, name)?;
            (0..strings.len())
                .map(|row| {
                    if strings.is_null(row) {
                        return Err(LoadError::NullValue {
                            row: offset + row,
                            column: name,
                        });
                    }
                    timestamp_cell(strings.value(row), offset + row, name)
                })
                .collect()
        }
        _ => {
            let casted = cast(col, &DataType::Timestamp(TimeUnit::Millisecond, None))?;
            let millis = casted
                .as_any()
                .downcast_ref::<TimestampMillisecondArray>()
                .ok_or_else(|| LoadError::UnexpectedColumnType {
                    column: name,
                    data_type: format!("{:?}", col.data_type()),
                })?;
            (0..millis.len())
                .map(|row| {
                    if millis.is_null(row) {
                        return Err(LoadError::NullValue {
                            row: offset + row,
                            column: name,
                        });
                    }
                    let raw = millis.value(row);
                    DateTime::<Utc>::from_timestamp_millis(raw)
                        .map(|dt| dt.naive_utc())
                        .ok_or_else(|| LoadError::InvalidTimestamp {
                            row: offset + row,
                            column: name,
                            value: raw.to_string(),
                        })
                })
                .collect()
        }
    }
}
