pub mod dataset_reader;
pub mod model_reader;
pub mod submission_reader;
pub mod version_reader;

pub use dataset_reader::DatasetReader;
pub use model_reader::ModelReader;
pub use submission_reader::SubmissionReader;
pub use version_reader::VersionReader;
