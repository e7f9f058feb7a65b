use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::RegionCode;
use crate::utils::constants::MAIN_MODEL_ID;

/// One row of the model results table: a trained model run with its
/// evaluation metrics and the environmental-data version it was trained
/// against.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ModelRun {
    pub model_id: u32,

    pub model_name: String,

    pub creation_date: NaiveDate,

    #[validate(range(min = 0.0))]
    pub mae: f64,

    #[validate(range(min = 0.0))]
    pub rmse: f64,

    /// Coefficient of determination; below zero the model performs worse
    /// than predicting the observed mean.
    pub r2: f64,

    pub mean_true: f64,
    pub mean_pred: f64,

    #[validate(range(min = 0.0))]
    pub std_true: f64,

    #[validate(range(min = 0.0))]
    pub std_pred: f64,

    pub parameters: String,

    pub env_data_version: u64,
}

impl ModelRun {
    pub fn is_main_model(&self) -> bool {
        self.model_id == MAIN_MODEL_ID
    }
}

/// A per-region prediction read from a model's prediction file.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub region: RegionCode,
    pub predicted: f64,
    pub observed: Option<f64>,
}

/// All predictions of one model run, with helpers for the value range used
/// by map color scales and for pairing predictions with observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionSet {
    records: Vec<PredictionRecord>,
}

impl PredictionSet {
    pub fn new(records: Vec<PredictionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Minimum and maximum predicted value, or None for an empty set.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.records.iter().map(|r| r.predicted);
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for value in iter {
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
        }
        Some((min, max))
    }

    /// (observed, predicted) series over the records that carry an observed
    /// value, in record order.
    pub fn observation_pairs(&self) -> (Vec<f64>, Vec<f64>) {
        let mut observed = Vec::new();
        let mut predicted = Vec::new();
        for record in &self.records {
            if let Some(truth) = record.observed {
                observed.push(truth);
                predicted.push(record.predicted);
            }
        }
        (observed, predicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(model_id: u32) -> ModelRun {
        ModelRun {
            model_id,
            model_name: "Spatiotemporal Random Forest".to_string(),
            creation_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            mae: 31.4,
            rmse: 58.9,
            r2: 0.21,
            mean_true: 44.0,
            mean_pred: 43.1,
            std_true: 66.2,
            std_pred: 30.5,
            parameters: "n_estimators=500".to_string(),
            env_data_version: 3,
        }
    }

    #[test]
    fn test_main_model_detection() {
        assert!(run(MAIN_MODEL_ID).is_main_model());
        assert!(!run(2).is_main_model());
    }

    #[test]
    fn test_metric_ranges_validated() {
        assert!(run(1).validate().is_ok());

        let mut bad = run(1);
        bad.mae = -0.5;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_value_range_and_pairs() {
        let set = PredictionSet::new(vec![
            PredictionRecord {
                region: RegionCode::new("PL911"),
                predicted: 10.0,
                observed: Some(12.0),
            },
            PredictionRecord {
                region: RegionCode::new("PL922"),
                predicted: 4.0,
                observed: None,
            },
            PredictionRecord {
                region: RegionCode::new("DE600"),
                predicted: 25.0,
                observed: Some(20.0),
            },
        ]);

        assert_eq!(set.value_range(), Some((4.0, 25.0)));

        let (observed, predicted) = set.observation_pairs();
        assert_eq!(observed, vec![12.0, 20.0]);
        assert_eq!(predicted, vec![10.0, 25.0]);

        assert_eq!(PredictionSet::default().value_range(), None);
    }
}
