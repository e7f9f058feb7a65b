use std::collections::{BTreeMap, BTreeSet};

use crate::error::{PipelineError, Result};
use crate::models::{RawSubmission, RegionCode, RegionDataset, ValidatedSubmission};
use crate::utils::constants::SUBMISSION_COLUMNS;

/// Validates candidate submissions against the canonical dataset.
///
/// Checks run in a fixed order and the first failure decides the reported
/// reason: shape, then variable-name collision, then numeric values, then
/// duplicate codes, then unknown codes, then missing codes. Each later
/// stage assumes the shape the earlier ones established, and the cheap
/// structural checks come before anything that walks the code universe.
pub struct SubmissionValidator {
    universe: BTreeSet<RegionCode>,
    existing_columns: BTreeSet<String>,
}

impl SubmissionValidator {
    pub fn new(universe: BTreeSet<RegionCode>, existing_columns: BTreeSet<String>) -> Self {
        Self {
            universe,
            existing_columns,
        }
    }

    /// Build a validator from the canonical dataset: its code column is the
    /// universe and its property keys (plus the geometry pseudo-column) are
    /// the reserved names.
    pub fn from_dataset(dataset: &RegionDataset) -> Result<Self> {
        Ok(Self::new(dataset.region_codes()?, dataset.column_names()))
    }

    pub fn universe(&self) -> &BTreeSet<RegionCode> {
        &self.universe
    }

    /// Validate a raw submission under the declared variable name.
    ///
    /// On success the rows are consumed into a code-to-value mapping ready
    /// to merge. On failure the error carries the concrete offending codes
    /// or values, so the submitter can fix the file without guessing.
    pub fn validate(
        &self,
        submission: &RawSubmission,
        variable_name: &str,
    ) -> Result<ValidatedSubmission> {
        Self::check_shape(submission, variable_name)?;
        self.check_variable_name(variable_name)?;
        let pairs = self.check_values(submission)?;
        self.check_duplicates(&pairs)?;
        let submitted: BTreeSet<RegionCode> = pairs.iter().map(|(code, _)| code.clone()).collect();
        self.check_unknown_codes(&submitted)?;
        self.check_missing_codes(&submitted)?;

        let values: BTreeMap<RegionCode, f64> = pairs.into_iter().collect();
        Ok(ValidatedSubmission::new(variable_name, values))
    }

    /// Structural checks that need no dataset state. Runs first inside
    /// [`validate`](Self::validate); the pipeline also calls it before
    /// touching storage, so malformed uploads never trigger a store read.
    pub fn check_shape(submission: &RawSubmission, variable_name: &str) -> Result<()> {
        if variable_name.trim().is_empty() {
            return Err(PipelineError::MalformedUpload(
                "the variable name is empty".to_string(),
            ));
        }
        if submission.is_empty() {
            return Err(PipelineError::MalformedUpload(
                "the file contains no rows".to_string(),
            ));
        }
        for (index, row) in submission.rows().iter().enumerate() {
            if row.len() != SUBMISSION_COLUMNS {
                return Err(PipelineError::MalformedUpload(format!(
                    "row {} has {} columns, expected exactly {}",
                    index + 1,
                    row.len(),
                    SUBMISSION_COLUMNS
                )));
            }
        }
        Ok(())
    }

    fn check_variable_name(&self, variable_name: &str) -> Result<()> {
        if self.existing_columns.contains(variable_name) {
            return Err(PipelineError::DuplicateVariable(variable_name.to_string()));
        }
        Ok(())
    }

    /// Parse every value as a finite number. Non-finite values are treated
    /// as non-numeric since the dataset cannot carry them.
    fn check_values(&self, submission: &RawSubmission) -> Result<Vec<(RegionCode, f64)>> {
        let mut pairs = Vec::with_capacity(submission.len());
        let mut bad_values = Vec::new();
        let mut seen_bad = BTreeSet::new();

        for row in submission.rows() {
            let raw = row[1].as_str();
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    pairs.push((RegionCode::new(row[0].as_str()), value));
                }
                _ => {
                    if seen_bad.insert(raw.to_string()) {
                        bad_values.push(raw.to_string());
                    }
                }
            }
        }

        if !bad_values.is_empty() {
            return Err(PipelineError::NonNumericValue { values: bad_values });
        }
        Ok(pairs)
    }

    fn check_duplicates(&self, pairs: &[(RegionCode, f64)]) -> Result<()> {
        let mut counts: BTreeMap<&RegionCode, usize> = BTreeMap::new();
        for (code, _) in pairs {
            *counts.entry(code).or_insert(0) += 1;
        }

        let duplicated: BTreeSet<RegionCode> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(code, _)| code.clone())
            .collect();

        if !duplicated.is_empty() {
            return Err(PipelineError::DuplicateRegion { codes: duplicated });
        }
        Ok(())
    }

    fn check_unknown_codes(&self, submitted: &BTreeSet<RegionCode>) -> Result<()> {
        let unknown: BTreeSet<RegionCode> =
            submitted.difference(&self.universe).cloned().collect();

        if !unknown.is_empty() {
            return Err(PipelineError::UnknownRegion { codes: unknown });
        }
        Ok(())
    }

    fn check_missing_codes(&self, submitted: &BTreeSet<RegionCode>) -> Result<()> {
        let missing: BTreeSet<RegionCode> =
            self.universe.difference(submitted).cloned().collect();

        if !missing.is_empty() {
            return Err(PipelineError::MissingRegion { codes: missing });
        }
        Ok(())
    }
}
