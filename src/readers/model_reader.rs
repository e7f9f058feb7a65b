use std::path::Path;

use csv::Trim;
use serde_json::Value;
use validator::Validate;

use crate::error::{PipelineError, Result};
use crate::models::{ModelRun, PredictionRecord, PredictionSet};
use crate::readers::DatasetReader;
use crate::utils::constants::{FIELD_DELIMITER, OBSERVED_COLUMN, PREDICTION_COLUMN};

/// Reads the model registry (`MODELS.csv`) and per-model prediction files.
pub struct ModelReader {
    delimiter: u8,
}

impl ModelReader {
    pub fn new() -> Self {
        Self {
            delimiter: FIELD_DELIMITER,
        }
    }

    /// Read all registered model runs, in registry order.
    ///
    /// Each run is range-checked (error metrics and standard deviations
    /// must be non-negative) so a corrupt registry row surfaces here
    /// instead of as nonsense output later. A missing registry reads as
    /// no runs.
    pub fn read_runs(&self, path: &Path) -> Result<Vec<ModelRun>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_path(path)?;

        let mut runs = Vec::new();
        for result in reader.deserialize() {
            let run: ModelRun = result?;
            run.validate()?;
            runs.push(run);
        }

        Ok(runs)
    }

    /// Look up one run by registry id.
    pub fn find_run(&self, path: &Path, model_id: u32) -> Result<Option<ModelRun>> {
        Ok(self
            .read_runs(path)?
            .into_iter()
            .find(|run| run.model_id == model_id))
    }

    /// Read a model's prediction file (GeoJSON keyed like the canonical
    /// dataset, with a `y_pred` property per region and optionally
    /// `y_true` where field observations exist).
    pub fn read_predictions(&self, path: &Path) -> Result<PredictionSet> {
        let dataset = DatasetReader::new().read_dataset(path)?;

        let mut records = Vec::with_capacity(dataset.len());
        for (index, feature) in dataset.features.iter().enumerate() {
            let region = feature.region_code().ok_or_else(|| {
                PipelineError::InvalidFormat(format!(
                    "prediction feature {} has no region code",
                    index
                ))
            })?;

            let predicted = feature
                .properties
                .get(PREDICTION_COLUMN)
                .and_then(Value::as_f64)
                .ok_or_else(|| {
                    PipelineError::InvalidFormat(format!(
                        "prediction for region {} has no numeric '{}' property",
                        region, PREDICTION_COLUMN
                    ))
                })?;

            let observed = feature
                .properties
                .get(OBSERVED_COLUMN)
                .and_then(Value::as_f64);

            records.push(PredictionRecord {
                region,
                predicted,
                observed,
            });
        }

        Ok(PredictionSet::new(records))
    }
}

impl Default for ModelReader {
    fn default() -> Self {
        Self::new()
    }
}
