pub mod dataset_writer;
pub mod version_writer;

pub use dataset_writer::DatasetWriter;
pub use version_writer::VersionWriter;
