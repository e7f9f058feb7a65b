use crate::analyzers::PredictionAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::{PipelineError, Result};
use crate::models::NutsLevel;
use crate::processors::{SubmissionValidator, UploadPipeline};
use crate::readers::{DatasetReader, ModelReader, SubmissionReader, VersionReader};
use crate::utils::constants::REGION_CODE_COLUMN;
use crate::utils::progress::ProgressReporter;

pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = match cli.data_dir {
        Some(dir) => Settings::with_data_dir(dir),
        None => Settings::load()?,
    };
    settings.silent |= cli.silent;

    match cli.command {
        Commands::Upload {
            input_file,
            variable,
        } => {
            println!("Uploading environmental data...");
            println!("Input file: {}", input_file.display());
            println!("Variable name: {}", variable);

            let silent = settings.silent;
            let pipeline = UploadPipeline::new(settings);

            let submission = SubmissionReader::new().read_submission(&input_file)?;
            let progress = ProgressReporter::new_spinner("Validating submission...", silent);

            let outcome = pipeline.submit_with_progress(&submission, &variable, Some(&progress))?;
            progress.finish_with_message("The data has been uploaded successfully.");

            println!(
                "✅ '{}' merged into {} regions as version {}",
                outcome.variable, outcome.regions, outcome.version
            );
        }

        Commands::Validate {
            input_file,
            variable,
        } => {
            println!("Validating submission...");
            println!("Input file: {}", input_file.display());

            let dataset = DatasetReader::new().read_dataset(&settings.dataset_path()?)?;
            let validator = SubmissionValidator::from_dataset(&dataset)?;
            let submission = SubmissionReader::new().read_submission(&input_file)?;

            match validator.validate(&submission, &variable) {
                Ok(validated) => {
                    println!(
                        "✅ Submission is valid: {} values for '{}', ready to upload",
                        validated.len(),
                        validated.variable()
                    );
                }
                Err(e) if e.is_rejection() => {
                    println!("❌ {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        Commands::Info { sample } => {
            println!("Environmental data store: {}", settings.data_dir().display());

            let upload_level = settings.upload_level()?;
            for level in [NutsLevel::Nuts1, NutsLevel::Nuts2, NutsLevel::Nuts3] {
                let path = settings.dataset_path_for(level);
                if !path.exists() {
                    println!("  {}: not present", level);
                    continue;
                }
                let dataset = DatasetReader::new().read_dataset(&path)?;
                println!(
                    "  {}: {} regions, {} environmental variables",
                    level,
                    dataset.len(),
                    dataset.variable_columns().len()
                );
                if level == upload_level {
                    let counts = dataset.country_counts();
                    let breakdown: Vec<String> = counts
                        .iter()
                        .map(|(country, count)| format!("{} {}", country, count))
                        .collect();
                    println!(
                        "    {} countries: {}",
                        counts.len(),
                        breakdown.join(", ")
                    );
                }
            }

            let log = VersionReader::new().read_log(&settings.versions_path())?;
            if log.is_empty() {
                println!("\nNo environmental variables have been versioned yet");
            } else {
                println!("\nVariable versions (latest: {}):", log.max_version());
                for record in log.records() {
                    println!("  v{}: {}", record.version, record.variable);
                }
            }

            if sample > 0 {
                let upload_path = settings.dataset_path()?;
                if upload_path.exists() {
                    let dataset = DatasetReader::new().read_dataset(&upload_path)?;
                    let columns = dataset.variable_columns();

                    println!("\nSample regions (showing {}):", sample);
                    for feature in dataset.features.iter().take(sample) {
                        let code = feature
                            .properties
                            .get(REGION_CODE_COLUMN)
                            .and_then(|v| v.as_str())
                            .unwrap_or("?");
                        let values: Vec<String> = columns
                            .iter()
                            .map(|name| {
                                let value = feature
                                    .properties
                                    .get(name)
                                    .map(|v| v.to_string())
                                    .unwrap_or_else(|| "null".to_string());
                                format!("{}={}", name, value)
                            })
                            .collect();
                        println!("  {}: {}", code, values.join(", "));
                    }
                }
            }
        }

        Commands::Models => {
            let runs = ModelReader::new().read_runs(&settings.models_path())?;

            if runs.is_empty() {
                println!("No model runs registered");
                return Ok(());
            }

            let log = VersionReader::new().read_log(&settings.versions_path())?;

            println!("Registered model runs:");
            for run in &runs {
                let marker = if run.is_main_model() { " [main]" } else { "" };
                println!(
                    "  {}. {} ({}){}",
                    run.model_id, run.model_name, run.creation_date, marker
                );
                println!(
                    "     MAE {:.2}, RMSE {:.2}, R² {:.3}, trained on data version {}",
                    run.mae, run.rmse, run.r2, run.env_data_version
                );
                let uploaded: Vec<&str> = log
                    .records_up_to(run.env_data_version)
                    .iter()
                    .map(|r| r.variable.as_str())
                    .collect();
                if !uploaded.is_empty() {
                    println!("     Uploaded variables at that version: {}", uploaded.join(", "));
                }
                if !run.parameters.is_empty() {
                    println!("     Parameters: {}", run.parameters);
                }
            }
        }

        Commands::Evaluate {
            model_id,
            tolerance,
        } => {
            let reader = ModelReader::new();
            let run = reader
                .find_run(&settings.models_path(), model_id)?
                .ok_or_else(|| {
                    PipelineError::InvalidFormat(format!(
                        "no model with id {} in {}",
                        model_id,
                        settings.models_path().display()
                    ))
                })?;

            println!("Evaluating model {} ({})...", run.model_id, run.model_name);

            let progress =
                ProgressReporter::new_spinner("Reading prediction file...", settings.silent);
            let predictions = reader.read_predictions(&settings.predictions_path(model_id))?;
            progress.set_message("Computing metrics...");

            let analyzer = PredictionAnalyzer::new();
            let metrics = analyzer.evaluate(&predictions)?;
            progress.finish_with_message("Evaluation complete");

            if let Some((min, max)) = predictions.value_range() {
                println!(
                    "\nPredictions: {} regions, values {:.3} to {:.3}",
                    predictions.len(),
                    min,
                    max
                );
            }
            println!("\n{}", metrics.summary());

            let drift = analyzer.drift_from_registry(&metrics, &run, tolerance);
            if drift.is_empty() {
                println!("\n✅ Metrics match the registry entry");
            } else {
                println!("\n⚠️  {} metrics drift from the registry:", drift.len());
                for item in drift {
                    println!(
                        "  {}: registered {:.4}, computed {:.4}",
                        item.metric, item.registered, item.computed
                    );
                }
            }
        }
    }

    Ok(())
}
