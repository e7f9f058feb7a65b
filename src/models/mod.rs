pub mod dataset;
pub mod model_run;
pub mod region;
pub mod submission;
pub mod version;

pub use dataset::{RegionDataset, RegionFeature};
pub use model_run::{ModelRun, PredictionRecord, PredictionSet};
pub use region::{NutsLevel, RegionCode};
pub use submission::{RawSubmission, ValidatedSubmission};
pub use version::{VersionLog, VersionRecord};
