use super::model::{Dataset, NormalizedRecord, StageSummary, SummaryRow};

/// Placeholder for a maximum with no values behind it.
pub const MISSING: &str = "MISSING";

// ---------------------------------------------------------------------------
// Max accumulator
// ---------------------------------------------------------------------------

/// Running maximum that skips absent and non-finite values instead of
/// letting them win (or count as zero).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MaxAccumulator(Option<f64>);

impl MaxAccumulator {
    fn push(&mut self, value: Option<f64>) {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            return;
        };
        self.0 = Some(match self.0 {
            Some(current) if current >= v => current,
            _ => v,
        });
    }
}

/// One accumulator per reported field.
#[derive(Debug, Clone, Default)]
struct StageAccumulator {
    stage_label: String,
    lateral_displacement: MaxAccumulator,
    vertical_displacement: MaxAccumulator,
    bending_moment: MaxAccumulator,
    shear_force: MaxAccumulator,
    axial_force: MaxAccumulator,
    y: MaxAccumulator,
    u_x: MaxAccumulator,
    u_y: MaxAccumulator,
    m: MaxAccumulator,
    q: MaxAccumulator,
    n: MaxAccumulator,
}

impl StageAccumulator {
    fn new(stage_label: &str) -> Self {
        Self {
            stage_label: stage_label.to_string(),
            ..Self::default()
        }
    }

    fn push(&mut self, rec: &NormalizedRecord) {
        let metrics = &rec.metrics;
        self.lateral_displacement.push(metrics.lateral_displacement);
        self.vertical_displacement.push(metrics.vertical_displacement);
        self.bending_moment.push(metrics.bending_moment);
        self.shear_force.push(metrics.shear_force);
        self.axial_force.push(metrics.axial_force);

        let raw = &rec.record;
        self.y.push(raw.y);
        self.u_x.push(raw.u_x);
        self.u_y.push(raw.u_y);
        self.m.push(raw.m);
        self.q.push(raw.q);
        self.n.push(raw.n);
    }

    fn finish(self, sort_key: u32) -> SummaryRow {
        SummaryRow {
            sort_key,
            stage_label: self.stage_label,
            lateral_displacement: self.lateral_displacement.0,
            vertical_displacement: self.vertical_displacement.0,
            bending_moment: self.bending_moment.0,
            shear_force: self.shear_force.0,
            axial_force: self.axial_force.0,
            y: self.y.0,
            u_x: self.u_x.0,
            u_y: self.u_y.0,
            m: self.m.0,
            q: self.q.0,
            n: self.n.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Group the dataset by sort key and take the maximum of every field.
///
/// A group keeps the label of the first record seen with its key.
pub fn aggregate(dataset: &Dataset) -> StageSummary {
    let mut groups: std::collections::BTreeMap<u32, StageAccumulator> = Default::default();
    for rec in &dataset.records {
        groups
            .entry(rec.stage.sort_key)
            .or_insert_with(|| StageAccumulator::new(&rec.stage.stage_label))
            .push(rec);
    }

    log::info!("aggregated {} rows into {} stages", dataset.len(), groups.len());

    groups
        .into_iter()
        .map(|(key, acc)| (key, acc.finish(key)))
        .collect()
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

/// Column headings of the presentation table, after the stage label.
pub const METRIC_HEADINGS: [&str; 5] = [
    "Lateral Displacement (mm)",
    "Vertical Displacement (mm)",
    "Bending Moment (kNm/m)",
    "Shear Force (kN/m)",
    "Axial Force (kN/m)",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTableRow {
    pub sort_key: u32,
    pub stage_label: String,
    /// Formatted cells in [`METRIC_HEADINGS`] order.
    pub cells: Vec<String>,
}

/// Presentation-ready summary, rows in ascending sort-key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub rows: Vec<SummaryTableRow>,
}

impl SummaryTable {
    /// Format the aggregated maxima with `precision` decimals.
    pub fn build(summary: &StageSummary, precision: usize) -> Self {
        let mut rows: Vec<SummaryTableRow> = summary
            .values()
            .map(|row| SummaryTableRow {
                sort_key: row.sort_key,
                stage_label: row.stage_label.clone(),
                cells: [
                    row.lateral_displacement,
                    row.vertical_displacement,
                    row.bending_moment,
                    row.shear_force,
                    row.axial_force,
                ]
                .iter()
                .map(|v| format_cell(*v, precision))
                .collect(),
            })
            .collect();
        rows.sort_by_key(|r| r.sort_key);
        Self { rows }
    }

    /// Plain-text rendering for terminal output.
    pub fn to_text(&self) -> String {
        let mut headings = vec!["sort", "Stage"];
        headings.extend(METRIC_HEADINGS);

        let mut grid: Vec<Vec<String>> = vec![headings.iter().map(|h| h.to_string()).collect()];
        for row in &self.rows {
            let mut line = vec![row.sort_key.to_string(), row.stage_label.clone()];
            line.extend(row.cells.iter().cloned());
            grid.push(line);
        }

        let widths: Vec<usize> = (0..headings.len())
            .map(|col| grid.iter().map(|line| line[col].chars().count()).max().unwrap_or(0))
            .collect();

        grid.iter()
            .map(|line| {
                line.iter()
                    .zip(&widths)
                    .map(|(cell, &w)| format!("{cell:>w$}"))
                    .collect::<Vec<_>>()
                    .join("  ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn format_cell(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => MISSING.to_string(),
    }
}
