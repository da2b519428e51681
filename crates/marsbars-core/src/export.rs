//! Recycling report export
//!
//! A report bundles the submitted waste entries with the result that was
//! shown for them, as pretty-printed JSON:
//!
//! ```json
//! {
//!   "timestamp": "2031-04-02T10:15:00.000Z",
//!   "wasteInputs": [ ... ],
//!   "results": { ... }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{RecyclingResult, WasteEntry};

/// Exported analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub waste_inputs: Vec<WasteEntry>,
    pub results: RecyclingResult,
}

impl ExportReport {
    /// Build a report stamped with the current time
    pub fn new(waste_inputs: Vec<WasteEntry>, results: RecyclingResult) -> Self {
        Self::at(Utc::now(), waste_inputs, results)
    }

    pub fn at(timestamp: DateTime<Utc>, waste_inputs: Vec<WasteEntry>, results: RecyclingResult) -> Self {
        Self {
            timestamp,
            waste_inputs,
            results,
        }
    }

    /// File name derived from the report timestamp
    pub fn filename(&self) -> String {
        export_filename(self.timestamp.timestamp_millis())
    }

    /// Two-space indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report into `dir` (created if missing), returning the file path
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.filename());
        fs::write(&path, self.to_json_pretty()?)?;
        tracing::info!(path = %path.display(), "Report exported");
        Ok(path)
    }

    /// Load a previously exported report
    pub fn read_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::InvalidData(format!("Not a recycling report ({}): {}", path.display(), e))
        })
    }
}

/// `mars-recycling-report-<epoch-ms>.json`
pub fn export_filename(epoch_ms: i64) -> String {
    format!("mars-recycling-report-{}.json", epoch_ms)
}

/// RFC 3339 with millisecond precision and a `Z` suffix
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::generate_fallback;
    use crate::models::total_quantity;
    use chrono::TimeZone;

    fn sample() -> ExportReport {
        let entries = vec![
            WasteEntry::new("1712000000000", "Aluminum", 5.0, "Research Equipment")
                .with_description("bent struts"),
        ];
        let results = generate_fallback(total_quantity(&entries), &entries);
        let ts = Utc.with_ymd_and_hms(2031, 4, 2, 10, 15, 0).unwrap();
        ExportReport::at(ts, entries, results)
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename(1712000000000),
            "mars-recycling-report-1712000000000.json"
        );
        assert_eq!(sample().filename(), "mars-recycling-report-1932891300000.json");
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&sample().to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["timestamp"], "2031-04-02T10:15:00.000Z");
        assert_eq!(json["wasteInputs"][0]["materialType"], "Aluminum");
        assert_eq!(json["results"]["resourceUsage"]["energy"], 14.0);
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample();

        let path = report.write_to_dir(&dir.path().join("reports")).unwrap();
        assert!(path.ends_with(report.filename()));

        let loaded = ExportReport::read_from_path(&path).unwrap();
        assert_eq!(loaded.results, report.results);
        assert_eq!(loaded, report);
    }

    #[test]
    fn test_read_rejects_other_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.json");
        std::fs::write(&path, r#"{"hello": "world"}"#).unwrap();
        assert!(matches!(
            ExportReport::read_from_path(&path),
            Err(Error::InvalidData(_))
        ));
    }
}
