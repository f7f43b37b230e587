use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

/// Columns every stage export must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Y", "u_x", "u_y", "M", "Q", "N"];

// ---------------------------------------------------------------------------
// RawRecord – one row of one stage export
// ---------------------------------------------------------------------------

/// A single row as read from a stage export. `None` marks a blank cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// File identifier (file name without extension) the row came from.
    pub source: Arc<str>,
    /// Depth coordinate.
    pub y: Option<f64>,
    /// Lateral displacement, metres until normalised.
    pub u_x: Option<f64>,
    /// Vertical displacement, metres until normalised.
    pub u_y: Option<f64>,
    /// Bending moment.
    pub m: Option<f64>,
    /// Shear force.
    pub q: Option<f64>,
    /// Axial force.
    pub n: Option<f64>,
}

// ---------------------------------------------------------------------------
// StageMeta – ordering key and label parsed from the file name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StageMeta {
    /// Canonical stage order, independent of file discovery order.
    pub sort_key: u32,
    pub stage_label: String,
}

// ---------------------------------------------------------------------------
// DerivedMetrics / NormalizedRecord
// ---------------------------------------------------------------------------

/// Absolute-value quantities used for summary reporting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedMetrics {
    pub lateral_displacement: Option<f64>,
    pub vertical_displacement: Option<f64>,
    pub bending_moment: Option<f64>,
    pub shear_force: Option<f64>,
    pub axial_force: Option<f64>,
}

/// A unit-normalised row with its derived magnitudes and stage attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Source row with `u_x` / `u_y` in millimetres.
    pub record: RawRecord,
    pub metrics: DerivedMetrics,
    pub stage: StageMeta,
}

// ---------------------------------------------------------------------------
// Dataset – every normalised row of the batch
// ---------------------------------------------------------------------------

/// All normalised rows in file-processing order. Rows within a file keep
/// their original order, which the profile plots rely on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub records: Vec<NormalizedRecord>,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct stages ordered by sort key.
    pub fn stages(&self) -> Vec<StageMeta> {
        let mut seen: BTreeMap<u32, StageMeta> = BTreeMap::new();
        for rec in &self.records {
            seen.entry(rec.stage.sort_key)
                .or_insert_with(|| rec.stage.clone());
        }
        seen.into_values().collect()
    }
}

// ---------------------------------------------------------------------------
// SummaryRow – per-stage maxima
// ---------------------------------------------------------------------------

/// Maxima over every record sharing one sort key. Absent values never win.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "sort")]
    pub sort_key: u32,
    #[serde(rename = "Stage")]
    pub stage_label: String,
    #[serde(rename = "Lateral Displacement (mm)")]
    pub lateral_displacement: Option<f64>,
    #[serde(rename = "Vertical Displacement (mm)")]
    pub vertical_displacement: Option<f64>,
    #[serde(rename = "Bending Moment (kNm/m)")]
    pub bending_moment: Option<f64>,
    #[serde(rename = "Shear Force (kN/m)")]
    pub shear_force: Option<f64>,
    #[serde(rename = "Axial Force (kN/m)")]
    pub axial_force: Option<f64>,
    #[serde(rename = "Y")]
    pub y: Option<f64>,
    pub u_x: Option<f64>,
    pub u_y: Option<f64>,
    #[serde(rename = "M")]
    pub m: Option<f64>,
    #[serde(rename = "Q")]
    pub q: Option<f64>,
    #[serde(rename = "N")]
    pub n: Option<f64>,
}

/// Summary rows keyed (and therefore iterated) by ascending sort key.
pub type StageSummary = BTreeMap<u32, SummaryRow>;
