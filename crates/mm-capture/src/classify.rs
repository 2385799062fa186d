//! Line classification.
//!
//! Pure, total mapping from a framed line to one of four structural
//! categories. Priority order matters: sentinel prefixes win over shape
//! checks, and anything that fails the telemetry shape falls through to
//! noise rather than erroring.

use std::sync::LazyLock;

use regex::Regex;

use mm_common::schema::{split_columns, FW_META_PREFIX, MM_COLUMNS_PREFIX, TELEMETRY_FIELD_COUNT};

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("timestamp regex"));

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("decimal regex"));

/// Structural category of one telemetry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// `#mm_columns=` line naming the telemetry fields. Later instances
    /// supersede earlier ones.
    ColumnSchema {
        /// Original line text, written verbatim to session files.
        raw: String,
        /// Parsed, trimmed column names (never empty).
        columns: Vec<String>,
    },
    /// `#fw_` firmware build metadata line, kept verbatim and accumulated
    /// in first-seen order.
    FirmwareMeta { raw: String },
    /// An 8-field numeric record: millisecond timestamp plus seven values.
    Telemetry(TelemetryRecord),
    /// Anything else. Carried only for optional diagnostic display.
    Noise { raw: String },
}

/// One accepted telemetry record.
///
/// Values are kept as the trimmed field text rather than parsed floats so
/// the persisted and echoed form is byte-identical to what the firmware
/// sent (modulo whitespace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryRecord {
    /// Field 0: firmware-side timestamp in milliseconds.
    pub timestamp_ms: u64,
    fields: Vec<String>,
}

impl TelemetryRecord {
    /// Normalized comma-joined form, as written to session files and echoed.
    pub fn as_csv_line(&self) -> String {
        self.fields.join(",")
    }
}

/// Classify one framed line. Total: never fails, never panics.
pub fn classify(line: &str) -> Category {
    if let Some(payload) = line.strip_prefix(MM_COLUMNS_PREFIX) {
        let columns = split_columns(payload);
        if !columns.is_empty() {
            return Category::ColumnSchema {
                raw: line.to_string(),
                columns,
            };
        }
        // A schema sentinel with no usable column names is not a schema.
        return Category::Noise {
            raw: line.to_string(),
        };
    }

    if line.starts_with(FW_META_PREFIX) {
        return Category::FirmwareMeta {
            raw: line.to_string(),
        };
    }

    if let Some(record) = parse_telemetry(line) {
        return Category::Telemetry(record);
    }

    Category::Noise {
        raw: line.to_string(),
    }
}

fn parse_telemetry(line: &str) -> Option<TelemetryRecord> {
    let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
    if fields.len() != TELEMETRY_FIELD_COUNT {
        return None;
    }
    if !TIMESTAMP_RE.is_match(&fields[0]) {
        return None;
    }
    if !fields[1..].iter().all(|f| DECIMAL_RE.is_match(f)) {
        return None;
    }
    // A digit string too long for u64 is noise, not an error.
    let timestamp_ms = fields[0].parse::<u64>().ok()?;
    Some(TelemetryRecord {
        timestamp_ms,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_schema_line() {
        let cat = classify("#mm_columns=timestamp, real_velocity ,out_r");
        match cat {
            Category::ColumnSchema { raw, columns } => {
                assert_eq!(raw, "#mm_columns=timestamp, real_velocity ,out_r");
                assert_eq!(columns, vec!["timestamp", "real_velocity", "out_r"]);
            }
            other => panic!("expected ColumnSchema, got {other:?}"),
        }
    }

    #[test]
    fn empty_column_schema_is_noise() {
        assert!(matches!(classify("#mm_columns="), Category::Noise { .. }));
        assert!(matches!(classify("#mm_columns= , ,"), Category::Noise { .. }));
    }

    #[test]
    fn firmware_meta_line() {
        let cat = classify("#fw_git_sha=deadbeef");
        assert_eq!(
            cat,
            Category::FirmwareMeta {
                raw: "#fw_git_sha=deadbeef".to_string()
            }
        );
    }

    #[test]
    fn telemetry_line() {
        match classify("120,0.5,-1.25,3,4,5,6,-7") {
            Category::Telemetry(rec) => {
                assert_eq!(rec.timestamp_ms, 120);
                assert_eq!(rec.as_csv_line(), "120,0.5,-1.25,3,4,5,6,-7");
            }
            other => panic!("expected Telemetry, got {other:?}"),
        }
    }

    #[test]
    fn telemetry_fields_are_trimmed() {
        match classify(" 10 , 1 ,2,3,4,5,6, 7 ") {
            Category::Telemetry(rec) => assert_eq!(rec.as_csv_line(), "10,1,2,3,4,5,6,7"),
            other => panic!("expected Telemetry, got {other:?}"),
        }
    }

    #[test]
    fn wrong_field_count_is_noise() {
        assert!(matches!(classify("abc,def"), Category::Noise { .. }));
        assert!(matches!(classify("1,2,3,4,5,6,7"), Category::Noise { .. }));
        assert!(matches!(classify("1,2,3,4,5,6,7,8,9"), Category::Noise { .. }));
    }

    #[test]
    fn non_numeric_fields_are_noise() {
        assert!(matches!(classify("x,1,2,3,4,5,6,7"), Category::Noise { .. }));
        assert!(matches!(classify("-1,1,2,3,4,5,6,7"), Category::Noise { .. }));
        assert!(matches!(classify("1,1,2,3,4,5,6,nan"), Category::Noise { .. }));
        assert!(matches!(classify("1,1,2,3,4,5,6,1."), Category::Noise { .. }));
    }

    #[test]
    fn overlong_timestamp_is_noise_not_error() {
        // Numeric-shaped but overflows u64; must fall through, not fail.
        let line = "99999999999999999999999999,1,2,3,4,5,6,7";
        assert!(matches!(classify(line), Category::Noise { .. }));
    }

    #[test]
    fn classification_is_total() {
        for line in [
            "",
            ",",
            "#mm_columns",
            "#fw_",
            "###",
            "0,0,0,0,0,0,0,0",
            "\u{7f}",
            "1,2,3,4,5,6,7,8,",
        ] {
            // Must return exactly one category without panicking.
            let _ = classify(line);
        }
    }
}
