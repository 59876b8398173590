//! CSV persistence for datasets and citation text.
//!
//! Datasets are two-column CSV files with header `Title,Year`. Citation
//! text is stored separately as newline-separated raw citation blocks so
//! the dataset file stays trivially diffable and mergeable.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::year;
use crate::models::Record;

/// Errors that can occur when reading or writing datasets
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested dataset file does not exist
    #[error("dataset not found: {0}")]
    NotFound(PathBuf),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding/decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Timestamp used in output file names, e.g. `25AUG30-14:02:59`
pub fn run_stamp() -> String {
    Local::now().format("%y%b%d-%H:%M:%S").to_string().to_uppercase()
}

/// Dataset file name for a run
pub fn dataset_file_name(stamp: &str) -> String {
    format!("publications_data_{}.csv", stamp)
}

/// Citation-text file name for a run
pub fn citations_file_name(stamp: &str) -> String {
    format!("citations_{}.txt", stamp)
}

/// Chart file name for a run
pub fn plot_file_name(stamp: &str) -> String {
    format!("plot{}.svg", stamp)
}

/// File names for a merge of two datasets, derived from the input stems
pub fn merged_file_names(first: &Path, second: &Path) -> (String, String) {
    let stem = |p: &Path| {
        p.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string())
    };
    let base = format!("merged_{}_and_{}", stem(first), stem(second));
    (format!("{}.csv", base), format!("{}_year_counts.svg", base))
}

/// Write a dataset to `dir/file_name`, creating the directory on demand.
pub fn save_dataset(dir: &Path, file_name: &str, records: &[Record]) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);

    let mut writer = csv::WriterBuilder::new().has_headers(true).from_path(&path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), records = records.len(), "saved dataset");
    Ok(path)
}

/// Write the non-empty citation blocks to `dir/file_name`.
pub fn save_citations(
    dir: &Path,
    file_name: &str,
    records: &[Record],
) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);

    let blocks: Vec<&str> = records
        .iter()
        .filter(|r| !r.citation.is_empty())
        .map(|r| r.citation.as_str())
        .collect();

    fs::write(&path, blocks.join("\n"))?;

    tracing::info!(path = %path.display(), citations = blocks.len(), "saved citation text");
    Ok(path)
}

/// Load a dataset, requiring the file to exist.
pub fn load_dataset(path: &Path) -> Result<Vec<Record>, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    read_records(path)
}

/// Load a prior dataset for resume; a missing file is "no previous dataset".
pub fn load_previous(path: &Path) -> Result<Vec<Record>, StoreError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no previous dataset found, starting fresh");
        return Ok(Vec::new());
    }
    read_records(path)
}

fn read_records(path: &Path) -> Result<Vec<Record>, StoreError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut records = Vec::new();

    for result in reader.deserialize::<Record>() {
        let mut record = result?;
        // Foreign or hand-edited files can carry junk year labels; coerce
        // them to a 4-digit year or the sentinel on the way in
        record.year = year::normalize(&record.year);
        records.push(record);
    }

    tracing::debug!(path = %path.display(), records = records.len(), "loaded dataset");
    Ok(records)
}
