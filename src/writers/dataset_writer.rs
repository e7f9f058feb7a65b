use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{PipelineError, Result};
use crate::models::RegionDataset;

/// Writes a canonical dataset file (GeoJSON FeatureCollection).
///
/// The dataset is staged to a temporary file in the same directory,
/// synced, then renamed over the canonical path. Readers therefore see
/// either the old dataset or the new one, never a partial write, and a
/// crash mid-write leaves the canonical file untouched.
pub struct DatasetWriter {
    pretty: bool,
}

impl DatasetWriter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output. Larger files, but diffable. The upload path writes
    /// compact.
    pub fn with_pretty(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn write_dataset(&self, dataset: &RegionDataset, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            PipelineError::InvalidFormat(format!(
                "dataset path {} has no parent directory",
                path.display()
            ))
        })?;

        let mut temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            if self.pretty {
                serde_json::to_writer_pretty(&mut writer, dataset)?;
            } else {
                serde_json::to_writer(&mut writer, dataset)?;
            }
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| PipelineError::Io(e.error))?;

        Ok(())
    }
}

impl Default for DatasetWriter {
    fn default() -> Self {
        Self::new()
    }
}
