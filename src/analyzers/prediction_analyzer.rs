use crate::error::{PipelineError, Result};
use crate::models::{ModelRun, PredictionSet};

/// Evaluation metrics for one model's predictions against field
/// observations.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionMetrics {
    pub pairs: usize,
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    pub mean_true: f64,
    pub mean_pred: f64,
    pub std_true: f64,
    pub std_pred: f64,
}

/// One metric where the freshly computed value disagrees with the model
/// registry.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDrift {
    pub metric: &'static str,
    pub registered: f64,
    pub computed: f64,
}

pub struct PredictionAnalyzer;

impl PredictionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a prediction set over the regions that carry an observed
    /// value. Fails if no region does, since every metric would be
    /// undefined.
    pub fn evaluate(&self, predictions: &PredictionSet) -> Result<PredictionMetrics> {
        let (y_true, y_pred) = predictions.observation_pairs();
        self.calculate_metrics(&y_true, &y_pred)
    }

    pub fn calculate_metrics(&self, y_true: &[f64], y_pred: &[f64]) -> Result<PredictionMetrics> {
        if y_true.is_empty() {
            return Err(PipelineError::InvalidFormat(
                "the prediction set has no observed values to evaluate against".to_string(),
            ));
        }
        if y_true.len() != y_pred.len() {
            return Err(PipelineError::InvalidFormat(format!(
                "observed and predicted series differ in length ({} vs {})",
                y_true.len(),
                y_pred.len()
            )));
        }

        let n = y_true.len() as f64;

        let mae = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).abs())
            .sum::<f64>()
            / n;

        let ss_res = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum::<f64>();
        let rmse = (ss_res / n).sqrt();

        let mean_true = y_true.iter().sum::<f64>() / n;
        let mean_pred = y_pred.iter().sum::<f64>() / n;

        let ss_tot = y_true.iter().map(|t| (t - mean_true).powi(2)).sum::<f64>();

        // Constant observations make the usual ratio undefined; score a
        // perfect fit as 1 and anything else as 0.
        let r2 = if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };

        Ok(PredictionMetrics {
            pairs: y_true.len(),
            mae,
            rmse,
            r2,
            mean_true,
            mean_pred,
            std_true: population_std(y_true, mean_true),
            std_pred: population_std(y_pred, mean_pred),
        })
    }

    /// Metrics whose computed value drifts from the registry row by more
    /// than the tolerance. An empty result means the registry still
    /// reflects the prediction file.
    pub fn drift_from_registry(
        &self,
        metrics: &PredictionMetrics,
        run: &ModelRun,
        tolerance: f64,
    ) -> Vec<MetricDrift> {
        let checks: [(&'static str, f64, f64); 7] = [
            ("mae", run.mae, metrics.mae),
            ("rmse", run.rmse, metrics.rmse),
            ("r2", run.r2, metrics.r2),
            ("mean_true", run.mean_true, metrics.mean_true),
            ("mean_pred", run.mean_pred, metrics.mean_pred),
            ("std_true", run.std_true, metrics.std_true),
            ("std_pred", run.std_pred, metrics.std_pred),
        ];

        checks
            .into_iter()
            .filter(|(_, registered, computed)| (registered - computed).abs() > tolerance)
            .map(|(metric, registered, computed)| MetricDrift {
                metric,
                registered,
                computed,
            })
            .collect()
    }
}

impl Default for PredictionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn population_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

impl PredictionMetrics {
    pub fn summary(&self) -> String {
        format!(
            "Observed/predicted pairs: {}\n\
            MAE:  {:.4}\n\
            RMSE: {:.4}\n\
            R²:   {:.4}\n\
            Mean (observed / predicted): {:.4} / {:.4}\n\
            Std  (observed / predicted): {:.4} / {:.4}",
            self.pairs,
            self.mae,
            self.rmse,
            self.r2,
            self.mean_true,
            self.mean_pred,
            self.std_true,
            self.std_pred
        )
    }
}
