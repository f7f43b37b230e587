use std::collections::BTreeMap;

use super::model::{Dataset, NormalizedRecord};

// ---------------------------------------------------------------------------
// Plotted quantities
// ---------------------------------------------------------------------------

/// The four depth-profile panels, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    LateralDisplacement,
    BendingMoment,
    ShearForce,
    AxialForce,
}

impl Quantity {
    pub const ALL: [Quantity; 4] = [
        Quantity::LateralDisplacement,
        Quantity::BendingMoment,
        Quantity::ShearForce,
        Quantity::AxialForce,
    ];

    pub fn axis_label(self) -> &'static str {
        match self {
            Quantity::LateralDisplacement => "Displacement (mm)",
            Quantity::BendingMoment => "Bending Moment (kNm/m)",
            Quantity::ShearForce => "Shear Force (kN/m)",
            Quantity::AxialForce => "Axial Force (kN/m)",
        }
    }

    /// Signed value plotted for a row.
    pub fn value(self, rec: &NormalizedRecord) -> Option<f64> {
        let raw = &rec.record;
        match self {
            Quantity::LateralDisplacement => raw.u_x,
            Quantity::BendingMoment => raw.m,
            Quantity::ShearForce => raw.q,
            Quantity::AxialForce => raw.n,
        }
    }
}

/// Label of the shared depth axis.
pub const DEPTH_LABEL: &str = "Elevation (m AHD)";

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// One line of a panel: `(value, depth)` points of a single stage label.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSeries {
    /// Lowest sort key seen for the label; orders the legend.
    pub sort_key: u32,
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// Split the dataset into one series per stage label.
///
/// Points keep dataset row order unless `sort_by_depth` is set, in which
/// case each series runs from the top of the wall down. Rows missing the
/// value or the depth are skipped.
pub fn profile_series(dataset: &Dataset, quantity: Quantity, sort_by_depth: bool) -> Vec<StageSeries> {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut series: Vec<StageSeries> = Vec::new();

    for rec in &dataset.records {
        let slot = *index.entry(rec.stage.stage_label.as_str()).or_insert_with(|| {
            series.push(StageSeries {
                sort_key: rec.stage.sort_key,
                label: rec.stage.stage_label.clone(),
                points: Vec::new(),
            });
            series.len() - 1
        });
        let s = &mut series[slot];
        s.sort_key = s.sort_key.min(rec.stage.sort_key);

        if let (Some(v), Some(y)) = (quantity.value(rec), rec.record.y) {
            s.points.push([v, y]);
        }
    }

    if sort_by_depth {
        for s in &mut series {
            s.points.sort_by(|a, b| b[1].total_cmp(&a[1]));
        }
    }
    series.sort_by_key(|s| s.sort_key);
    series
}

/// Min/max of the finite values in a set of series, `None` when there are
/// none.
pub fn value_range(series: &[StageSeries], axis: usize) -> Option<(f64, f64)> {
    series
        .iter()
        .flat_map(|s| s.points.iter().map(move |p| p[axis]))
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DerivedMetrics, RawRecord, StageMeta};
    use std::sync::Arc;

    fn rec(sort_key: u32, label: &str, y: f64, u_x: Option<f64>) -> NormalizedRecord {
        NormalizedRecord {
            record: RawRecord {
                source: Arc::from(label),
                y: Some(y),
                u_x,
                u_y: None,
                m: Some(y * 2.0),
                q: None,
                n: None,
            },
            metrics: DerivedMetrics::default(),
            stage: StageMeta {
                sort_key,
                stage_label: label.to_string(),
            },
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            records: vec![
                rec(4, "Dig", -2.0, Some(3.0)),
                rec(4, "Dig", 0.0, Some(1.0)),
                rec(2, "Initial", 0.0, Some(0.5)),
                rec(2, "Initial", -1.0, None),
                rec(4, "Dig", -1.0, Some(2.0)),
            ],
        }
    }

    #[test]
    fn one_series_per_label_ordered_by_key() {
        let series = profile_series(&dataset(), Quantity::LateralDisplacement, false);
        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Initial", "Dig"]);
    }

    #[test]
    fn points_keep_row_order_and_skip_missing() {
        let series = profile_series(&dataset(), Quantity::LateralDisplacement, false);
        assert_eq!(series[0].points, vec![[0.5, 0.0]]);
        assert_eq!(series[1].points, vec![[3.0, -2.0], [1.0, 0.0], [2.0, -1.0]]);
    }

    #[test]
    fn depth_sort_runs_top_down() {
        let series = profile_series(&dataset(), Quantity::LateralDisplacement, true);
        assert_eq!(series[1].points, vec![[1.0, 0.0], [2.0, -1.0], [3.0, -2.0]]);
    }

    #[test]
    fn quantity_selects_signed_field() {
        let series = profile_series(&dataset(), Quantity::BendingMoment, false);
        assert_eq!(series[0].points, vec![[0.0, 0.0], [-2.0, -1.0]]);
    }

    #[test]
    fn value_range_spans_all_series() {
        let series = profile_series(&dataset(), Quantity::LateralDisplacement, false);
        assert_eq!(value_range(&series, 0), Some((0.5, 3.0)));
        assert_eq!(value_range(&series, 1), Some((-2.0, 0.0)));
        assert_eq!(value_range(&[], 0), None);
    }

    #[test]
    fn value_range_ignores_non_finite_points() {
        let series = vec![StageSeries {
            sort_key: 1,
            label: "Dig".to_string(),
            points: vec![[f64::INFINITY, 0.0], [-6.0, -1.0], [2.0, f64::NAN]],
        }];
        assert_eq!(value_range(&series, 0), Some((-6.0, 2.0)));
        assert_eq!(value_range(&series, 1), Some((-1.0, 0.0)));
    }
}
