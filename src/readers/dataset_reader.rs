use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{PipelineError, Result};
use crate::models::{RegionCode, RegionDataset};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;

/// Reads a canonical dataset file (GeoJSON FeatureCollection).
pub struct DatasetReader {
    use_mmap: bool,
}

impl DatasetReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    /// Memory-map the file instead of streaming it. Worthwhile for the
    /// NUTS3 dataset, whose geometries dominate the file size.
    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    pub fn read_dataset(&self, path: &Path) -> Result<RegionDataset> {
        let dataset = if self.use_mmap {
            self.read_dataset_mmap(path)?
        } else {
            self.read_dataset_buffered(path)?
        };

        if dataset.collection_type != "FeatureCollection" {
            return Err(PipelineError::InvalidFormat(format!(
                "{} is not a FeatureCollection (found type '{}')",
                path.display(),
                dataset.collection_type
            )));
        }

        Ok(dataset)
    }

    fn read_dataset_buffered(&self, path: &Path) -> Result<RegionDataset> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        Ok(serde_json::from_reader(reader)?)
    }

    fn read_dataset_mmap(&self, path: &Path) -> Result<RegionDataset> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(serde_json::from_slice(&mmap)?)
    }

    /// The code universe of a dataset file, without keeping the features.
    pub fn read_region_codes(&self, path: &Path) -> Result<BTreeSet<RegionCode>> {
        self.read_dataset(path)?.region_codes()
    }
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}
