//! Telemetry log format shared by the capture tool and its consumers.
//!
//! The firmware emits line-oriented telemetry over the serial link. Three
//! line shapes matter downstream (the plotting dashboard, the CSV-to-source
//! generators, the parameter UI), so their identifying constants live here
//! rather than inside the capture tool.

/// Sentinel prefix for column-schema lines: `#mm_columns=a,b,c,...`.
pub const MM_COLUMNS_PREFIX: &str = "#mm_columns=";

/// Sentinel prefix for firmware metadata lines: `#fw_target=...`,
/// `#fw_git_sha=...`, and friends.
pub const FW_META_PREFIX: &str = "#fw_";

/// A telemetry record is exactly this many comma-separated fields:
/// a millisecond timestamp followed by seven decimal values.
pub const TELEMETRY_FIELD_COUNT: usize = 8;

/// File-name prefix for capture session files
/// (`stm32_log_YYYYMMDD_HHMMSS.csv`).
pub const LOG_FILE_PREFIX: &str = "stm32_log_";

/// Split the payload of a column-schema line into trimmed column names,
/// dropping empty entries. Returns an empty vector for a degenerate payload.
pub fn split_columns(payload: &str) -> Vec<String> {
    payload
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_columns_trims_and_drops_empties() {
        assert_eq!(
            split_columns("timestamp, real_velocity ,,out_r"),
            vec!["timestamp", "real_velocity", "out_r"]
        );
    }

    #[test]
    fn split_columns_empty_payload() {
        assert!(split_columns("").is_empty());
        assert!(split_columns(" , ,").is_empty());
    }
}
