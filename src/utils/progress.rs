use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Console progress for upload and evaluation runs.
///
/// Holds no bar when silenced, so every method degrades to a no-op and
/// callers never branch on verbosity themselves.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new_spinner(message: &str, silent: bool) -> Self {
        if silent {
            return Self { bar: None };
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { bar: Some(pb) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.bar {
            pb.set_message(message.to_string());
        }
    }

    pub fn finish_with_message(&self, message: &str) {
        if let Some(ref pb) = self.bar {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(ref pb) = self.bar {
            pb.finish();
        }
    }
}
