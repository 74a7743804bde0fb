//! Batch driver: apply every catalog filter to every image in a directory.
//!
//! The driver is idempotent by construction. Each (image, filter) pair maps
//! to one deterministic output path, and the existence of that file is the
//! completion record: existing outputs are never recomputed or overwritten,
//! so interrupted runs resume safely and repeat runs do no work.
//!
//! Per-pair lifecycle: `Pending -> Skipped (output exists) | Written |
//! Failed (filter or write error)`. Only directory setup and a bad filter
//! subset are fatal; everything else is accounted in the [`RunSummary`] and
//! the run continues.

use crate::core::error::{BatchError, BatchResult};
use crate::core::types::has_recognized_extension;
use crate::filters::registry::FilterRegistry;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Placeholder file name that clean mode leaves in place.
const CLEAN_PLACEHOLDER: &str = ".gitkeep";

/// Options controlling a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Delete pre-existing output files before the run, forcing every
    /// filter to recompute.
    pub clean: bool,
    /// Restrict the run to this subset of filter ids (registration order
    /// is still respected). `None` runs the full enabled catalog.
    pub filters: Option<Vec<String>>,
}

/// Why a single (image, filter) pair failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The filter rejected the image (degenerate dimensions).
    UnsupportedShape,
    /// Encoding or writing the output file failed.
    OutputWrite,
}

/// One failed (image, filter) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairFailure {
    /// Input file name.
    pub image: String,
    /// Filter id.
    pub filter: String,
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable cause.
    pub message: String,
}

/// Result of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files matching a recognized image extension, readable or not.
    pub images_seen: usize,
    /// Outputs newly computed and written this run.
    pub outputs_written: usize,
    /// Outputs skipped because the file already existed.
    pub outputs_skipped: usize,
    /// Files that matched by extension but failed to decode.
    pub unreadable_inputs: usize,
    /// Non-fatal per-pair failures.
    pub failures: Vec<PairFailure>,
}

impl RunSummary {
    /// Whether every attempted pair either completed or was already done.
    pub fn is_clean(&self) -> bool {
        self.unreadable_inputs == 0 && self.failures.is_empty()
    }
}

/// Applies the filter catalog to a directory of images.
pub struct BatchRunner {
    registry: FilterRegistry,
    options: BatchOptions,
}

impl BatchRunner {
    /// Create a runner over the given registry with default options.
    pub fn new(registry: FilterRegistry) -> Self {
        Self {
            registry,
            options: BatchOptions::default(),
        }
    }

    /// Replace the run options.
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the batch: every selected filter against every image in
    /// `input_dir`, outputs under `output_dir` as `{stem}_{id}.{ext}`.
    ///
    /// Fatal errors are limited to directory setup and unknown filter
    /// names in the subset; everything else lands in the summary.
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> BatchResult<RunSummary> {
        if !input_dir.is_dir() {
            return Err(BatchError::InputDirectory {
                path: input_dir.to_path_buf(),
            });
        }

        if let Some(subset) = &self.options.filters {
            for name in subset {
                if !self.registry.contains(name) {
                    return Err(BatchError::UnknownFilter { name: name.clone() });
                }
            }
        }

        fs::create_dir_all(output_dir).map_err(|source| BatchError::OutputDirectory {
            path: output_dir.to_path_buf(),
            source,
        })?;

        if self.options.clean {
            self.clean_output_dir(output_dir)?;
        }

        let mut summary = RunSummary::default();

        for path in discover_images(input_dir) {
            summary.images_seen += 1;

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let image = match image::open(&path) {
                Ok(image) => image,
                Err(error) => {
                    warn!("could not read {}: {}", path.display(), error);
                    summary.unreadable_inputs += 1;
                    continue;
                }
            };

            info!("processing {}", file_name);
            self.apply_catalog(&image, &path, output_dir, &file_name, &mut summary);
        }

        info!(
            "batch complete: {} written, {} skipped, {} unreadable, {} failed",
            summary.outputs_written,
            summary.outputs_skipped,
            summary.unreadable_inputs,
            summary.failures.len()
        );

        Ok(summary)
    }

    /// Apply every selected filter to one decoded image.
    fn apply_catalog(
        &self,
        image: &image::DynamicImage,
        input_path: &Path,
        output_dir: &Path,
        file_name: &str,
        summary: &mut RunSummary,
    ) {
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = input_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        for (id, entry) in self.registry.entries() {
            if !entry.enabled {
                continue;
            }
            if let Some(subset) = &self.options.filters {
                if !subset.iter().any(|name| name == id) {
                    continue;
                }
            }

            let output_path = output_dir.join(format!("{}_{}.{}", stem, id, extension));

            if output_path.exists() {
                debug!("{}: {} already exists, skipped", file_name, id);
                summary.outputs_skipped += 1;
                continue;
            }

            let result = match entry.filter.apply(image) {
                Ok(result) => result,
                Err(error) => {
                    warn!("{}: {} failed: {}", file_name, id, error);
                    summary.failures.push(PairFailure {
                        image: file_name.to_string(),
                        filter: id.to_string(),
                        kind: FailureKind::UnsupportedShape,
                        message: error.to_string(),
                    });
                    continue;
                }
            };

            match result.save(&output_path) {
                Ok(()) => {
                    debug!("{}: {} saved to {}", file_name, id, output_path.display());
                    summary.outputs_written += 1;
                }
                Err(error) => {
                    warn!(
                        "{}: writing {} failed: {}",
                        file_name,
                        output_path.display(),
                        error
                    );
                    // A partial file would make the next run skip this
                    // pair, so try not to leave one behind
                    let _ = fs::remove_file(&output_path);
                    summary.failures.push(PairFailure {
                        image: file_name.to_string(),
                        filter: id.to_string(),
                        kind: FailureKind::OutputWrite,
                        message: error.to_string(),
                    });
                }
            }
        }
    }

    /// Remove regular files from the output directory, keeping the
    /// placeholder marker and any subdirectories.
    fn clean_output_dir(&self, output_dir: &Path) -> BatchResult<()> {
        let entries = fs::read_dir(output_dir).map_err(|source| BatchError::CleanFailed {
            path: output_dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| BatchError::CleanFailed {
                path: output_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if path.file_name().map(|n| n == CLEAN_PLACEHOLDER).unwrap_or(false) {
                continue;
            }

            fs::remove_file(&path).map_err(|source| BatchError::CleanFailed {
                path: path.clone(),
                source,
            })?;
            debug!("cleaned {}", path.display());
        }

        Ok(())
    }
}

/// Enumerate candidate images directly inside `dir`, in file-name order.
fn discover_images(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_recognized_extension(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_clean() {
        let mut summary = RunSummary::default();
        assert!(summary.is_clean());

        summary.unreadable_inputs = 1;
        assert!(!summary.is_clean());

        summary.unreadable_inputs = 0;
        summary.failures.push(PairFailure {
            image: "a.png".to_string(),
            filter: "sepia".to_string(),
            kind: FailureKind::OutputWrite,
            message: "disk full".to_string(),
        });
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary {
            images_seen: 2,
            outputs_written: 5,
            outputs_skipped: 17,
            unreadable_inputs: 1,
            failures: Vec::new(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"outputs_written\":5"));
    }
}
