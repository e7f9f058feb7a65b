use std::path::Path;

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{PipelineError, Result};
use crate::models::{RawSubmission, VersionRecord};
use crate::processors::SubmissionValidator;
use crate::readers::{DatasetReader, SubmissionReader, VersionReader};
use crate::utils::{ProgressReporter, UploadLock};
use crate::writers::{DatasetWriter, VersionWriter};

/// Result of an accepted upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub variable: String,
    pub version: u64,
    pub regions: usize,
}

/// Runs one submission end to end: lock, validate, merge, persist,
/// version.
///
/// The two stores are written in a fixed order. The merged dataset is
/// staged and renamed into place first; the version record is appended
/// only afterwards. A crash at any point therefore never leaves a
/// version record naming a column the dataset does not have. Rejections
/// happen before any write, so a rejected submission leaves both stores
/// byte-for-byte untouched.
pub struct UploadPipeline {
    settings: Settings,
    submission_reader: SubmissionReader,
    dataset_reader: DatasetReader,
    version_reader: VersionReader,
    dataset_writer: DatasetWriter,
    version_writer: VersionWriter,
}

impl UploadPipeline {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            submission_reader: SubmissionReader::new(),
            dataset_reader: DatasetReader::new(),
            version_reader: VersionReader::new(),
            dataset_writer: DatasetWriter::new(),
            version_writer: VersionWriter::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Submit a file from disk under the declared variable name.
    pub fn submit_file(&self, path: &Path, variable_name: &str) -> Result<UploadOutcome> {
        let submission = self.submission_reader.read_submission(path)?;
        self.submit(&submission, variable_name)
    }

    /// Submit an already-loaded table under the declared variable name.
    pub fn submit(&self, submission: &RawSubmission, variable_name: &str) -> Result<UploadOutcome> {
        self.submit_with_progress(submission, variable_name, None)
    }

    /// As [`submit`](Self::submit), reporting phase changes to a progress
    /// spinner.
    pub fn submit_with_progress(
        &self,
        submission: &RawSubmission,
        variable_name: &str,
        progress: Option<&ProgressReporter>,
    ) -> Result<UploadOutcome> {
        // Structural rejections need no store access, not even the lock.
        SubmissionValidator::check_shape(submission, variable_name)?;

        let _lock = UploadLock::acquire(&self.settings.lock_path())?;

        let dataset_path = self.settings.dataset_path()?;
        debug!(dataset = %dataset_path.display(), rows = submission.len(), "validating submission");

        report(progress, "Reading canonical dataset...");
        let mut dataset = self
            .dataset_reader
            .read_dataset(&dataset_path)
            .map_err(Self::as_persistence)?;

        report(progress, "Validating submission...");
        let validator = SubmissionValidator::from_dataset(&dataset).map_err(Self::as_persistence)?;
        let validated = validator.validate(submission, variable_name)?;

        let log = self
            .version_reader
            .read_log(&self.settings.versions_path())
            .map_err(Self::as_persistence)?;
        let version = log.next_version();

        report(progress, "Merging new column...");
        dataset
            .insert_column(validated.variable(), validated.values())
            .map_err(Self::as_persistence)?;

        report(progress, "Writing dataset...");
        self.dataset_writer
            .write_dataset(&dataset, &dataset_path)
            .map_err(Self::as_persistence)?;

        // The dataset now carries the column. If this append fails the log
        // is merely behind the dataset, which the next upload tolerates;
        // the reverse order could fabricate a version with no data.
        report(progress, "Recording version...");
        self.version_writer
            .append_record(
                &self.settings.versions_path(),
                &VersionRecord::new(validated.variable(), version),
            )
            .map_err(|e| {
                PipelineError::Persistence(format!(
                    "the dataset was updated but recording version {} of '{}' failed: {}",
                    version,
                    validated.variable(),
                    e
                ))
            })?;

        info!(
            variable = validated.variable(),
            version,
            regions = validated.len(),
            "merged new environmental variable"
        );

        Ok(UploadOutcome {
            variable: validated.variable().to_string(),
            version,
            regions: validated.len(),
        })
    }

    /// Reclassify store-side failures as persistence errors, keeping
    /// submitter-fixable rejections intact.
    fn as_persistence(err: PipelineError) -> PipelineError {
        if err.is_rejection() || err.is_retryable() {
            err
        } else {
            PipelineError::Persistence(err.to_string())
        }
    }
}

fn report(progress: Option<&ProgressReporter>, message: &str) {
    if let Some(progress) = progress {
        progress.set_message(message);
    }
}
