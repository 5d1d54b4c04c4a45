use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Display units – powers of 1024 above the stored KB
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SizeUnit {
    #[default]
    KB,
    MB,
    GB,
    TB,
    PB,
}

/// Scale factor and the three labels each presentation uses for a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitLabels {
    /// Multiply a KB size by this to express it in the unit.
    pub factor: f64,
    /// Column header of the converted size in the table.
    pub value_label: &'static str,
    /// Y-axis label of the time-series chart.
    pub axis_label: &'static str,
    /// Caption of the total indicator.
    pub total_label: &'static str,
}

const KIB: f64 = 1024.0;

const UNIT_TABLE: [UnitLabels; 5] = [
    UnitLabels {
        factor: 1.0,
        value_label: "Download size (KB)",
        axis_label: "Size (KB)",
        total_label: "Total stored (KB):",
    },
    UnitLabels {
        factor: 1.0 / KIB,
        value_label: "Download size (MB)",
        axis_label: "Size (MB)",
        total_label: "Total stored (MB):",
    },
    UnitLabels {
        factor: 1.0 / (KIB * KIB),
        value_label: "Download size (GB)",
        axis_label: "Size (GB)",
        total_label: "Total stored (GB):",
    },
    UnitLabels {
        factor: 1.0 / (KIB * KIB * KIB),
        value_label: "Download size (TB)",
        axis_label: "Size (TB)",
        total_label: "Total stored (TB):",
    },
    UnitLabels {
        factor: 1.0 / (KIB * KIB * KIB * KIB),
        value_label: "Download size (PB)",
        axis_label: "Size (PB)",
        total_label: "Total stored (PB):",
    },
];

impl SizeUnit {
    pub const ALL: [SizeUnit; 5] = [
        SizeUnit::KB,
        SizeUnit::MB,
        SizeUnit::GB,
        SizeUnit::TB,
        SizeUnit::PB,
    ];

    pub fn labels(self) -> &'static UnitLabels {
        &UNIT_TABLE[self as usize]
    }

    pub fn factor(self) -> f64 {
        self.labels().factor
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeUnit::KB => "KB",
            SizeUnit::MB => "MB",
            SizeUnit::GB => "GB",
            SizeUnit::TB => "TB",
            SizeUnit::PB => "PB",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizeUnit::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown size unit '{s}'"))
    }
}

/// Express a KB size in `unit`. Returns `(scaled_value, scale_factor)`.
pub fn convert_unit(size_kb: f64, unit: SizeUnit) -> (f64, f64) {
    let factor = unit.factor();
    (size_kb * factor, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors_step_by_1024() {
        assert_eq!(SizeUnit::KB.factor(), 1.0);
        for pair in SizeUnit::ALL.windows(2) {
            let ratio = pair[0].factor() / pair[1].factor();
            assert!((ratio - 1024.0).abs() < 1e-9, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_convert_unit() {
        assert_eq!(convert_unit(2048.0, SizeUnit::MB), (2.0, 1.0 / 1024.0));
        assert_eq!(convert_unit(512.0, SizeUnit::KB).0, 512.0);
    }

    #[test]
    fn test_gb_round_trip() {
        let size_kb = 123_456.789;
        let (gb, factor) = convert_unit(size_kb, SizeUnit::GB);
        let back = gb / factor;
        assert!((back - size_kb).abs() < 1e-6);
    }

    #[test]
    fn test_labels_follow_unit() {
        assert_eq!(SizeUnit::TB.labels().total_label, "Total stored (TB):");
        assert_eq!(SizeUnit::MB.labels().axis_label, "Size (MB)");
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("gb".parse::<SizeUnit>(), Ok(SizeUnit::GB));
        assert!("EB".parse::<SizeUnit>().is_err());
    }
}
