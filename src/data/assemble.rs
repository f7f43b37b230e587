use super::error::{PipelineError, Result};
use super::model::{Dataset, NormalizedRecord, StageMeta, REQUIRED_COLUMNS};
use super::transform::MeasuredRow;

/// The prepared rows of one stage export, ready to be merged.
#[derive(Debug, Clone, PartialEq)]
pub struct StageBatch {
    pub identifier: String,
    pub stage: StageMeta,
    /// Header names of the source file.
    pub columns: Vec<String>,
    pub rows: Vec<MeasuredRow>,
}

/// Merge per-file batches into one dataset, attaching each batch's stage to
/// its rows. Batch order and row order are kept as given.
pub fn assemble(batches: Vec<StageBatch>) -> Result<Dataset> {
    if batches.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    for batch in &batches {
        check_columns(batch)?;
    }

    let expected: usize = batches.iter().map(|b| b.rows.len()).sum();
    let n_stages = batches.len();
    let mut records = Vec::with_capacity(expected);

    for batch in batches {
        let stage = batch.stage;
        records.extend(batch.rows.into_iter().map(|row| NormalizedRecord {
            record: row.record,
            metrics: row.metrics,
            stage: stage.clone(),
        }));
    }
    debug_assert_eq!(records.len(), expected);

    log::info!("assembled {} rows from {n_stages} stage files", records.len());
    Ok(Dataset { records })
}

fn check_columns(batch: &StageBatch) -> Result<()> {
    match REQUIRED_COLUMNS
        .into_iter()
        .find(|name| !batch.columns.iter().any(|c| c == name))
    {
        Some(missing) => Err(PipelineError::SchemaMismatch {
            file: batch.identifier.clone(),
            column: missing.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DerivedMetrics, RawRecord};
    use std::sync::Arc;

    fn batch(identifier: &str, sort_key: u32, depths: &[f64]) -> StageBatch {
        StageBatch {
            identifier: identifier.to_string(),
            stage: StageMeta {
                sort_key,
                stage_label: format!("Stage {sort_key}"),
            },
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: depths
                .iter()
                .map(|&y| MeasuredRow {
                    record: RawRecord {
                        source: Arc::from(identifier),
                        y: Some(y),
                        u_x: Some(1.0),
                        u_y: Some(1.0),
                        m: Some(1.0),
                        q: Some(1.0),
                        n: Some(1.0),
                    },
                    metrics: DerivedMetrics::default(),
                })
                .collect(),
        }
    }

    #[test]
    fn row_count_is_conserved() {
        let dataset = assemble(vec![
            batch("W-1-A", 1, &[0.0, -1.0, -2.0]),
            batch("W-2-B", 2, &[]),
            batch("W-3-C", 3, &[0.0, -1.0]),
        ])
        .unwrap();
        assert_eq!(dataset.len(), 5);
    }

    #[test]
    fn stage_is_attached_and_order_is_kept() {
        let dataset = assemble(vec![
            batch("W-5-E", 5, &[0.0, -1.0]),
            batch("W-1-A", 1, &[0.0]),
        ])
        .unwrap();
        let keys: Vec<u32> = dataset.records.iter().map(|r| r.stage.sort_key).collect();
        assert_eq!(keys, vec![5, 5, 1]);
        let ys: Vec<Option<f64>> = dataset.records.iter().map(|r| r.record.y).collect();
        assert_eq!(ys, vec![Some(0.0), Some(-1.0), Some(0.0)]);
        assert_eq!(dataset.records[2].stage.stage_label, "Stage 1");
    }

    #[test]
    fn empty_batch_list_is_an_error() {
        assert!(matches!(assemble(Vec::new()), Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn batch_missing_a_column_is_rejected() {
        let mut bad = batch("W-2-B", 2, &[0.0]);
        bad.columns.retain(|c| c != "N");
        let err = assemble(vec![batch("W-1-A", 1, &[0.0]), bad]).unwrap_err();
        match err {
            PipelineError::SchemaMismatch { file, column } => {
                assert_eq!(file, "W-2-B");
                assert_eq!(column, "N");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
