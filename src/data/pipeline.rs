use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::assemble::{assemble, StageBatch};
use super::error::{PipelineError, Result};
use super::loader::{identifier_for, load_table, LoaderOptions};
use super::model::{Dataset, StageSummary};
use super::stage::extract_stage;
use super::summary::aggregate;
use super::transform::{measure_rows, DISPLACEMENT_SCALE};

/// Knobs for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub loader: LoaderOptions,
    /// Factor applied to `u_x` / `u_y`.
    pub displacement_scale: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            loader: LoaderOptions::default(),
            displacement_scale: DISPLACEMENT_SCALE,
        }
    }
}

/// Everything the viewer and the exporters consume.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineOutput {
    pub dataset: Dataset,
    pub summary: StageSummary,
}

/// Load, normalise, assemble and aggregate a batch of stage exports.
///
/// Files are prepared in parallel but merged in the order of `paths`.
pub fn run(paths: &[PathBuf], options: &PipelineOptions) -> Result<PipelineOutput> {
    if paths.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let batches: Vec<StageBatch> = paths
        .par_iter()
        .map(|path| prepare_stage(path, options))
        .collect::<Result<_>>()?;

    let dataset = assemble(batches)?;
    let summary = aggregate(&dataset);
    Ok(PipelineOutput { dataset, summary })
}

/// Key extraction happens before the file is read so a bad name fails fast.
fn prepare_stage(path: &Path, options: &PipelineOptions) -> Result<StageBatch> {
    let stage = extract_stage(&identifier_for(path))?;
    let table = load_table(path, &options.loader)?;
    log::debug!(
        "{}: stage {} ({}), {} rows",
        table.identifier,
        stage.sort_key,
        stage.stage_label,
        table.records.len()
    );

    Ok(StageBatch {
        rows: measure_rows(&table.records, options.displacement_scale),
        identifier: table.identifier,
        stage,
        columns: table.columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::discover_stage_files;
    use crate::data::summary::SummaryTable;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const HEADER: &str = "Structural element\tNode\tX\tY\tu_x\tu_y\tN\tQ\tM\n";
    const UNITS: &str = "[-]\t[-]\t[m]\t[m]\t[m]\t[m]\t[kN/m]\t[kN/m]\t[kNm/m]\n";

    fn write_stage(dir: &Path, name: &str, rows: &[(f64, f64, f64)]) {
        let mut text = String::from(HEADER);
        for (i, (y, u_x, m)) in rows.iter().enumerate() {
            if i == 2 {
                text.push_str(UNITS);
            }
            text.push_str(&format!("Plate_1\t{i}\t0.0\t{y}\t{u_x}\t0.001\t-10.0\t2.0\t{m}\n"));
        }
        fs::write(dir.join(name), text).unwrap();
    }

    fn sample_dir() -> TempDir {
        let dir = tempdir().unwrap();
        let rows = [(0.0, -0.005, 1.0), (-1.0, -0.004, -7.5), (-2.0, -0.002, 3.0), (-3.0, 0.0, 0.0)];
        write_stage(dir.path(), "Wall-5-Backfill[Phase_5].txt", &rows);
        write_stage(dir.path(), "Wall-1-Initial[Phase_1].txt", &rows[..3]);
        write_stage(dir.path(), "Wall-3-Excavation[Phase_3].txt", &rows);
        dir
    }

    #[test]
    fn runs_whole_batch() {
        let dir = sample_dir();
        let paths = discover_stage_files(dir.path(), "txt").unwrap();
        let output = run(&paths, &PipelineOptions::default()).unwrap();

        assert_eq!(output.dataset.len(), 4 + 3 + 4);
        let keys: Vec<u32> = output.summary.keys().copied().collect();
        assert_eq!(keys, vec![1, 3, 5]);

        let excavation = &output.summary[&3];
        assert_eq!(excavation.stage_label, "Excavation");
        assert_eq!(excavation.lateral_displacement, Some(5.0));
        assert_eq!(excavation.bending_moment, Some(7.5));
        assert_eq!(excavation.axial_force, Some(10.0));

        let table = SummaryTable::build(&output.summary, 1);
        let labels: Vec<&str> = table.rows.iter().map(|r| r.stage_label.as_str()).collect();
        assert_eq!(labels, vec!["Initial", "Excavation", "Backfill"]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dir = sample_dir();
        let paths = discover_stage_files(dir.path(), "txt").unwrap();
        let first = run(&paths, &PipelineOptions::default()).unwrap();
        let second = run(&paths, &PipelineOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn dataset_follows_path_order() {
        let dir = sample_dir();
        let paths = discover_stage_files(dir.path(), "txt").unwrap();
        let output = run(&paths, &PipelineOptions::default()).unwrap();
        let first_of_each: Vec<u32> = output
            .dataset
            .records
            .iter()
            .map(|r| r.stage.sort_key)
            .fold(Vec::new(), |mut acc, k| {
                if acc.last() != Some(&k) {
                    acc.push(k);
                }
                acc
            });
        // file names sort as Wall-1, Wall-3, Wall-5
        assert_eq!(first_of_each, vec![1, 3, 5]);
    }

    #[test]
    fn malformed_name_aborts_batch() {
        let dir = sample_dir();
        write_stage(dir.path(), "Wall summary.txt", &[(0.0, 0.0, 0.0)]);
        let paths = discover_stage_files(dir.path(), "txt").unwrap();
        let err = run(&paths, &PipelineOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedIdentifier { ref identifier } if identifier == "Wall summary"
        ));
    }

    #[test]
    fn no_files_is_an_error() {
        let err = run(&[], &PipelineOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }
}
