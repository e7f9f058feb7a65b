pub mod submission_validator;
pub mod upload_pipeline;

pub use submission_validator::SubmissionValidator;
pub use upload_pipeline::{UploadOutcome, UploadPipeline};
