//! Constants shared across the ingestion pipeline.

/// Default directory holding the canonical data store.
pub const DEFAULT_DATA_DIR: &str = "data";

/// File name of the append-only version log inside the data directory.
pub const VERSIONS_FILE: &str = "ENV_VARIABLES_VERSIONS.csv";

/// File name of the model registry inside the data directory.
pub const MODELS_FILE: &str = "MODELS.csv";

/// Subdirectory of the data directory holding per-model prediction files.
pub const PREDICTIONS_DIR: &str = "predictions";

/// Suffix of per-model prediction files, prefixed by the model id.
pub const PREDICTIONS_FILE_SUFFIX: &str = "_MODEL_PREDICTIONS.geojson";

/// Lock file guarding the data directory against concurrent uploads.
pub const UPLOAD_LOCK_FILE: &str = ".upload.lock";

/// Property key carrying the NUTS region code in every dataset feature.
pub const REGION_CODE_COLUMN: &str = "NUTS_ID";

/// Pseudo-column name under which feature geometries are reported.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// Property key carrying predicted tick abundance in prediction files.
pub const PREDICTION_COLUMN: &str = "y_pred";

/// Property key carrying observed tick abundance in prediction files.
pub const OBSERVED_COLUMN: &str = "y_true";

/// Dataset properties that describe region geometry rather than
/// environmental variables.
pub const METADATA_COLUMNS: [&str; 4] = ["CENTER_X", "CENTER_Y", "CENTER_LAT", "CENTER_LON"];

/// Field delimiter used by submissions, the version log and the model
/// registry.
pub const FIELD_DELIMITER: u8 = b';';

/// Buffer size for streaming reads of the canonical datasets.
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Expected number of columns in a submission row.
pub const SUBMISSION_COLUMNS: usize = 2;

/// Registry id of the model whose predictions back the default map view.
pub const MAIN_MODEL_ID: u32 = 1;

/// Number of sample regions shown in dataset overviews.
pub const OVERVIEW_SAMPLE_ROWS: usize = 6;
