use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::StagePalette;
use crate::config::AppConfig;
use crate::data::model::StageSummary;
use crate::data::pipeline::PipelineOutput;
use crate::render::{write_figure, FigureOptions};

/// Write the per-stage maxima, one CSV row per sort key.
pub fn write_summary_csv(path: &Path, summary: &StageSummary) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in summary.values() {
        writer.serialize(row).context("writing summary row")?;
    }
    writer.flush().context("flushing summary CSV")?;
    log::info!("summary written to {}", path.display());
    Ok(())
}

/// Write the figure (and the summary CSV when configured) into `dir`.
pub fn export_artifacts(
    config: &AppConfig,
    dir: &Path,
    output: &PipelineOutput,
    palette: &StagePalette,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let figure_path = config.figure_path(dir);
    let options = FigureOptions {
        width: config.output.figure_width,
        height: config.output.figure_height,
        sort_by_depth: config.output.sort_by_depth,
    };
    write_figure(&figure_path, &output.dataset, palette, &options)
        .with_context(|| format!("rendering {}", figure_path.display()))?;
    written.push(figure_path);

    if let Some(summary_path) = config.summary_path(dir) {
        write_summary_csv(&summary_path, &output.summary)?;
        written.push(summary_path);
    }
    Ok(written)
}
