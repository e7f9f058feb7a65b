use std::collections::BTreeSet;

use thiserror::Error;

use crate::models::RegionCode;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("This data is in the wrong format: {0}")]
    MalformedUpload(String),

    #[error("The environmental data already contains a variable named '{0}'")]
    DuplicateVariable(String),

    #[error("This data contains non-numerical values: {}", join_values(.values))]
    NonNumericValue { values: Vec<String> },

    #[error(
        "This data contains more than one value for the following regions: {}",
        join_codes(.codes)
    )]
    DuplicateRegion { codes: BTreeSet<RegionCode> },

    #[error("This data contains unknown NUTS codes: {}", join_codes(.codes))]
    UnknownRegion { codes: BTreeSet<RegionCode> },

    #[error("This data lacks values for the following regions: {}", join_codes(.codes))]
    MissingRegion { codes: BTreeSet<RegionCode> },

    #[error("Something went wrong while updating the environmental dataset, please try again: {0}")]
    Persistence(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl PipelineError {
    /// True for outcomes the submitter can fix by correcting the upload
    /// and resubmitting.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PipelineError::MalformedUpload(_)
                | PipelineError::DuplicateVariable(_)
                | PipelineError::NonNumericValue { .. }
                | PipelineError::DuplicateRegion { .. }
                | PipelineError::UnknownRegion { .. }
                | PipelineError::MissingRegion { .. }
        )
    }

    /// True for failures caused by the storage layer rather than the upload.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::Persistence(_))
    }
}

fn join_codes(codes: &BTreeSet<RegionCode>) -> String {
    codes
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_values(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ")
}
