use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Trim;

use crate::error::{PipelineError, Result};
use crate::models::RawSubmission;
use crate::utils::constants::FIELD_DELIMITER;

/// Reads user-submitted environmental data files.
///
/// Submissions are semicolon-separated text with no header row. Rows are
/// loaded verbatim as strings; shape and value checks belong to the
/// validator, so a file with the wrong column count or non-numeric values
/// still loads here and is rejected downstream with a precise reason.
pub struct SubmissionReader {
    delimiter: u8,
}

impl SubmissionReader {
    pub fn new() -> Self {
        Self {
            delimiter: FIELD_DELIMITER,
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read a submission file into raw rows.
    ///
    /// A missing or unopenable file is an I/O error. Content that cannot
    /// be decoded as delimited text is reported as a malformed upload,
    /// since the file itself came from the submitter.
    pub fn read_submission(&self, path: &Path) -> Result<RawSubmission> {
        let file = File::open(path)?;
        self.read_from(BufReader::new(file))
    }

    fn read_from<R: Read>(&self, reader: R) -> Result<RawSubmission> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| PipelineError::MalformedUpload(e.to_string()))?;
            let row: Vec<String> = record.iter().map(|field| field.to_string()).collect();

            // A trailing newline yields one empty field; skip it rather
            // than reporting a phantom one-column row.
            if row.len() == 1 && row[0].is_empty() {
                continue;
            }
            rows.push(row);
        }

        Ok(RawSubmission::new(rows))
    }
}

impl Default for SubmissionReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_two_column_submission() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "PL911;1.5")?;
        writeln!(temp_file, "PL922;2.0")?;
        writeln!(temp_file, "DE600;0.25")?;

        let reader = SubmissionReader::new();
        let submission = reader.read_submission(temp_file.path())?;

        assert_eq!(submission.len(), 3);
        assert_eq!(submission.rows()[0], vec!["PL911", "1.5"]);
        assert_eq!(submission.rows()[2], vec!["DE600", "0.25"]);

        Ok(())
    }

    #[test]
    fn test_fields_are_trimmed() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, " PL911 ; 1.5 ")?;

        let reader = SubmissionReader::new();
        let submission = reader.read_submission(temp_file.path())?;

        assert_eq!(submission.rows()[0], vec!["PL911", "1.5"]);

        Ok(())
    }

    #[test]
    fn test_ragged_rows_are_preserved_for_validation() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "PL911;1.5")?;
        writeln!(temp_file, "PL922;2.0;extra")?;

        let reader = SubmissionReader::new();
        let submission = reader.read_submission(temp_file.path())?;

        assert_eq!(submission.rows()[0].len(), 2);
        assert_eq!(submission.rows()[1].len(), 3);

        Ok(())
    }

    #[test]
    fn test_empty_file_yields_empty_submission() -> Result<()> {
        let temp_file = NamedTempFile::new()?;

        let reader = SubmissionReader::new();
        let submission = reader.read_submission(temp_file.path())?;

        assert!(submission.is_empty());

        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let reader = SubmissionReader::new();
        let err = reader
            .read_submission(Path::new("/nonexistent/upload.csv"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }

    #[test]
    fn test_custom_delimiter() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "PL911,1.5")?;

        let reader = SubmissionReader::with_delimiter(b',');
        let submission = reader.read_submission(temp_file.path())?;

        assert_eq!(submission.rows()[0], vec!["PL911", "1.5"]);

        Ok(())
    }
}
