use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{MAIN_MODEL_ID, OVERVIEW_SAMPLE_ROWS};

#[derive(Parser)]
#[command(name = "tickboard-processor")]
#[command(about = "Environmental-data ingestion and versioning for the TickBoard dataset")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        help = "Data directory holding the canonical store [default: data]"
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Suppress progress output")]
    pub silent: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a submission and merge it into the canonical dataset
    Upload {
        #[arg(short, long, help = "Submission file (semicolon-separated, no header)")]
        input_file: PathBuf,

        #[arg(short = 'n', long, help = "Name of the new environmental variable")]
        variable: String,
    },

    /// Check a submission against the canonical dataset without writing
    Validate {
        #[arg(short, long, help = "Submission file (semicolon-separated, no header)")]
        input_file: PathBuf,

        #[arg(short = 'n', long, help = "Name of the new environmental variable")]
        variable: String,
    },

    /// Display the canonical datasets, variable versions and sample rows
    Info {
        #[arg(
            short,
            long,
            default_value_t = OVERVIEW_SAMPLE_ROWS,
            help = "Sample rows to display"
        )]
        sample: usize,
    },

    /// List registered model runs and their evaluation metrics
    Models,

    /// Recompute a model's metrics from its prediction file and compare
    /// them with the registry
    Evaluate {
        #[arg(
            short,
            long,
            default_value_t = MAIN_MODEL_ID,
            help = "Registry id of the model"
        )]
        model_id: u32,

        #[arg(
            long,
            default_value = "0.001",
            help = "Tolerance when comparing against registered metrics"
        )]
        tolerance: f64,
    },
}
