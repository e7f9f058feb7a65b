use std::path::Path;

use csv::Trim;

use crate::error::Result;
use crate::models::{VersionLog, VersionRecord};
use crate::utils::constants::FIELD_DELIMITER;

/// Reads the append-only variable version log.
///
/// The log is semicolon-separated with a `variable;version` header. A
/// store that has never accepted an upload has no log file yet; that
/// reads as an empty log (maximum version 0), so the first accepted
/// variable becomes version 1.
pub struct VersionReader {
    delimiter: u8,
}

impl VersionReader {
    pub fn new() -> Self {
        Self {
            delimiter: FIELD_DELIMITER,
        }
    }

    pub fn read_log(&self, path: &Path) -> Result<VersionLog> {
        if !path.exists() {
            return Ok(VersionLog::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_path(path)?;

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: VersionRecord = result?;
            records.push(record);
        }

        Ok(VersionLog::new(records))
    }
}

impl Default for VersionReader {
    fn default() -> Self {
        Self::new()
    }
}
