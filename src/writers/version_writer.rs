use std::fs::OpenOptions;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::models::VersionRecord;
use crate::utils::constants::FIELD_DELIMITER;

/// Appends records to the variable version log.
///
/// The log is append-only. A record is written only after the merged
/// dataset has been renamed into place, so the log never names a
/// variable the dataset lacks. The file and its header are created on
/// first append.
pub struct VersionWriter {
    delimiter: u8,
}

impl VersionWriter {
    pub fn new() -> Self {
        Self {
            delimiter: FIELD_DELIMITER,
        }
    }

    pub fn append_record(&self, path: &Path, record: &VersionRecord) -> Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .from_writer(file);

        if needs_header {
            writer.write_record(["variable", "version"])?;
        }
        writer.serialize(record)?;
        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|e| PipelineError::Persistence(e.to_string()))?;
        file.sync_all()?;

        Ok(())
    }
}

impl Default for VersionWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::VersionReader;
    use tempfile::TempDir;

    #[test]
    fn test_first_append_creates_file_with_header() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("ENV_VARIABLES_VERSIONS.csv");

        VersionWriter::new().append_record(&path, &VersionRecord::new("TMAX1", 1))?;

        let text = std::fs::read_to_string(&path)?;
        assert_eq!(text, "variable;version\nTMAX1;1\n");

        Ok(())
    }

    #[test]
    fn test_appends_preserve_existing_records() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("ENV_VARIABLES_VERSIONS.csv");
        let writer = VersionWriter::new();

        writer.append_record(&path, &VersionRecord::new("TMAX1", 1))?;
        writer.append_record(&path, &VersionRecord::new("TCDsum", 2))?;
        writer.append_record(&path, &VersionRecord::new("Impervious", 3))?;

        let log = VersionReader::new().read_log(&path)?;
        assert_eq!(log.len(), 3);
        assert_eq!(log.records()[2], VersionRecord::new("Impervious", 3));
        assert_eq!(log.max_version(), 3);

        Ok(())
    }

    #[test]
    fn test_header_is_not_repeated_on_append() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("ENV_VARIABLES_VERSIONS.csv");
        let writer = VersionWriter::new();

        writer.append_record(&path, &VersionRecord::new("TMAX1", 1))?;
        writer.append_record(&path, &VersionRecord::new("TCDsum", 2))?;

        let text = std::fs::read_to_string(&path)?;
        assert_eq!(text.matches("variable;version").count(), 1);

        Ok(())
    }
}
