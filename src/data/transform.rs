use super::model::{DerivedMetrics, RawRecord};

/// Metres to millimetres.
pub const DISPLACEMENT_SCALE: f64 = 1000.0;

/// Rescale the displacement fields of a row; every other field is untouched.
pub fn normalize_units(record: &RawRecord, scale: f64) -> RawRecord {
    RawRecord {
        u_x: record.u_x.map(|v| v * scale),
        u_y: record.u_y.map(|v| v * scale),
        ..record.clone()
    }
}

/// Magnitudes of the signed quantities of an already normalised row.
pub fn derive_metrics(record: &RawRecord) -> DerivedMetrics {
    DerivedMetrics {
        lateral_displacement: record.u_x.map(f64::abs),
        vertical_displacement: record.u_y.map(f64::abs),
        bending_moment: record.m.map(f64::abs),
        shear_force: record.q.map(f64::abs),
        axial_force: record.n.map(f64::abs),
    }
}

/// A normalised row paired with its derived magnitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    pub record: RawRecord,
    pub metrics: DerivedMetrics,
}

/// Normalise and derive every row of one file, keeping row order.
pub fn measure_rows(records: &[RawRecord], scale: f64) -> Vec<MeasuredRow> {
    records
        .iter()
        .map(|raw| {
            let record = normalize_units(raw, scale);
            let metrics = derive_metrics(&record);
            MeasuredRow { record, metrics }
        })
        .collect()
}
