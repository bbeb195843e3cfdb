mod reference;
mod schema;

pub use reference::reference_dataset;
pub use schema::{
    CityConfig, Coordinates, Dataset, Destination, GeoBounds, MapConfig, DEFAULT_AVERAGE_SPEED_KMH,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Load the dataset for this run.
///
/// # Arguments
///
/// * `path` - Optional path to a YAML dataset. If None, the built-in reference dataset is used.
///
/// # Errors
///
/// Returns an error if:
/// - The dataset file does not exist
/// - The dataset file cannot be read
/// - The YAML cannot be parsed
pub fn load_dataset(path: Option<PathBuf>) -> Result<Dataset> {
    match path {
        Some(path) => load_dataset_file(&path),
        None => {
            tracing::debug!("using built-in reference dataset");
            Ok(reference_dataset())
        }
    }
}

fn load_dataset_file(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        anyhow::bail!("Dataset file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file at {}", path.display()))?;

    let dataset: Dataset = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse dataset: invalid YAML in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        cities = dataset.cities.len(),
        destinations = dataset.destinations.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Render a dataset as YAML, suitable for `--config`.
pub fn dataset_to_yaml(dataset: &Dataset) -> Result<String> {
    serde_saphyr::to_string(dataset).context("Failed to serialize dataset")
}
