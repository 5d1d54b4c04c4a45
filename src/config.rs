use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::filter::SynopticHours;
use crate::data::units::SizeUnit;

// ---------------------------------------------------------------------------
// Startup settings
// ---------------------------------------------------------------------------

/// Initial filter values. Every field is optional in the JSON file.
///
/// ```json
/// {
///   "unit": "GB",
///   "synoptic_hours": "00Z+12Z",
///   "start": "2023-01-01",
///   "end": "2023-09-13",
///   "observation_types": ["prepbufr", "gpsro"],
///   "file_types": ["gdas"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub unit: SizeUnit,
    pub synoptic_hours: SynopticHours,
    /// First day shown. Defaults to the earliest cycle in the table.
    pub start: Option<NaiveDate>,
    /// Last day shown (inclusive). Defaults to the latest cycle in the table.
    pub end: Option<NaiveDate>,
    /// Preselected observation types. Empty selects the first one available.
    pub observation_types: Vec<String>,
    /// Preselected file types. Empty selects the first one available.
    pub file_types: Vec<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        log::debug!("Loaded settings from {}: {settings:?}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"unit": "GB", "synoptic_hours": "06Z+18Z"}"#).unwrap();
        assert_eq!(settings.unit, SizeUnit::GB);
        assert_eq!(settings.synoptic_hours, SynopticHours::H06And18);
        assert!(settings.start.is_none());
        assert!(settings.observation_types.is_empty());
    }

    #[test]
    fn test_full_settings() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "unit": "MB",
                "synoptic_hours": "00Z+06Z+12Z+18Z",
                "start": "2023-01-01",
                "end": "2023-09-13",
                "observation_types": ["prepbufr"],
                "file_types": ["gdas", "gfs"]
            }"#,
        )
        .unwrap();
        assert_eq!(settings.synoptic_hours, SynopticHours::All);
        assert_eq!(settings.end, NaiveDate::from_ymd_opt(2023, 9, 13));
        assert_eq!(settings.file_types.len(), 2);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Settings::load(Path::new("/nonexistent/armobs.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/armobs.json"));
    }
}
