//! Export of a merged dataset to its destination file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use nuts_model::{ExportOptions, OutputFormat};
use nuts_transform::OutputDataset;

use crate::error::{OutputError, Result};
use crate::gpkg::write_geopackage;

/// What was written where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub layer_name: String,
    pub features: usize,
}

/// Write `dataset` to `path`, replacing any previous file.
///
/// The file is built next to the destination and renamed over it once
/// complete, so a failed export leaves either the previous file or nothing
/// at `path`.
pub fn export(dataset: &OutputDataset, path: &Path, options: &ExportOptions) -> Result<ExportReport> {
    let start = Instant::now();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| OutputError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = temp_path_for(path, options.format);
    remove_if_exists(&temp_path)?;

    let written = match options.format {
        OutputFormat::GeoPackage => {
            write_geopackage(&temp_path, dataset, &options.layer_name, options.crs)
        }
    };
    let features = match written {
        Ok(features) => features,
        Err(err) => {
            discard(&temp_path);
            return Err(err);
        }
    };

    if let Err(e) = fs::rename(&temp_path, path) {
        discard(&temp_path);
        return Err(OutputError::AtomicWriteFailed {
            temp_path,
            target_path: path.to_path_buf(),
            source: e,
        });
    }

    tracing::info!(
        path = %path.display(),
        layer = %options.layer_name,
        driver = options.format.driver_name(),
        features,
        duration_ms = start.elapsed().as_millis(),
        "exported dataset"
    );
    Ok(ExportReport {
        path: path.to_path_buf(),
        layer_name: options.layer_name.clone(),
        features,
    })
}

/// Sibling temp file, e.g. `out.gpkg` -> `out.gpkg.tmp`.
fn temp_path_for(path: &Path, format: OutputFormat) -> PathBuf {
    path.with_extension(format!("{}.tmp", format.extension()))
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OutputError::Io {
            operation: "remove stale temp file",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove temp file");
    }
}
