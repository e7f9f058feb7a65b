pub mod constants;
pub mod lockfile;
pub mod progress;

pub use constants::*;
pub use lockfile::UploadLock;
pub use progress::ProgressReporter;
