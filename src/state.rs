use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::StagePalette;
use crate::config::AppConfig;
use crate::data::loader::discover_stage_files;
use crate::data::pipeline::{self, PipelineOutput};
use crate::data::profile::{profile_series, Quantity, StageSeries};
use crate::data::summary::SummaryTable;
use crate::export::export_artifacts;

// ---------------------------------------------------------------------------
// Loaded batch
// ---------------------------------------------------------------------------

/// A processed folder of stage exports plus everything derived for display.
pub struct LoadedBatch {
    pub dir: PathBuf,
    pub n_files: usize,
    pub output: PipelineOutput,
    pub table: SummaryTable,
    pub palette: StagePalette,
    /// One entry per panel, in [`Quantity::ALL`] order.
    pub panels: Vec<(Quantity, Vec<StageSeries>)>,
}

impl LoadedBatch {
    /// Discover and process every stage export in `dir`.
    pub fn load(dir: &Path, config: &AppConfig) -> Result<Self> {
        let paths = discover_stage_files(dir, &config.input.extension)?;
        let output = pipeline::run(&paths, &config.pipeline_options())
            .with_context(|| format!("processing {}", dir.display()))?;

        let table = SummaryTable::build(&output.summary, config.output.precision);
        let palette = StagePalette::new(
            output
                .dataset
                .stages()
                .iter()
                .map(|s| s.stage_label.as_str()),
        );
        let panels = build_panels(&output, config.output.sort_by_depth);

        Ok(Self {
            dir: dir.to_path_buf(),
            n_files: paths.len(),
            output,
            table,
            palette,
            panels,
        })
    }

    pub fn export(&self, config: &AppConfig) -> Result<Vec<PathBuf>> {
        export_artifacts(config, &self.dir, &self.output, &self.palette)
    }
}

fn build_panels(output: &PipelineOutput, sort_by_depth: bool) -> Vec<(Quantity, Vec<StageSeries>)> {
    Quantity::ALL
        .iter()
        .map(|&q| (q, profile_series(&output.dataset, q, sort_by_depth)))
        .collect()
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Processed batch (None until a folder loads successfully).
    pub batch: Option<LoadedBatch>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Last informational message (exports written, etc.).
    pub info_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            batch: None,
            status_message: None,
            info_message: None,
        }
    }

    /// Process a folder, replacing the current batch on success.
    pub fn load_dir(&mut self, dir: &Path) {
        match LoadedBatch::load(dir, &self.config) {
            Ok(batch) => {
                log::info!(
                    "Loaded {} stage files ({} rows) from {}",
                    batch.n_files,
                    batch.output.dataset.len(),
                    dir.display()
                );
                self.config.input.dir = dir.to_path_buf();
                self.batch = Some(batch);
                self.status_message = None;
                self.info_message = None;
                if self.config.output.export_on_load {
                    self.export();
                }
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", dir.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Re-run the pipeline on the current folder.
    pub fn reload(&mut self) {
        let dir = self.config.input.dir.clone();
        self.load_dir(&dir);
    }

    /// Switch the point ordering of the plotted series. The loaded dataset is
    /// reused; nothing is read from disk.
    pub fn set_sort_by_depth(&mut self, sort_by_depth: bool) {
        self.config.output.sort_by_depth = sort_by_depth;
        if let Some(batch) = &mut self.batch {
            batch.panels = build_panels(&batch.output, sort_by_depth);
        }
    }

    /// Write the figure and summary for the current batch.
    pub fn export(&mut self) {
        let Some(batch) = &self.batch else {
            return;
        };
        match batch.export(&self.config) {
            Ok(paths) => {
                let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                self.info_message = Some(format!("Saved {}", names.join(", ")));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
