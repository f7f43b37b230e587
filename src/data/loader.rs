use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::ReaderBuilder;

use super::error::{PipelineError, Result};
use super::model::{RawRecord, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Loader options
// ---------------------------------------------------------------------------

/// How a stage export is laid out on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderOptions {
    /// Field separator (PLAXIS writes tabs).
    pub delimiter: u8,
    /// Zero-based line index of the units row, dropped before parsing.
    pub units_row: Option<usize>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            units_row: Some(3),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – one parsed stage export
// ---------------------------------------------------------------------------

/// The rows of one stage export, before any normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// File name without extension; the stage key and label come from it.
    pub identifier: String,
    /// Header names as written in the file.
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// List the files in `dir` with the given extension (case-insensitive),
/// sorted by file name so the processing order is reproducible.
pub fn discover_stage_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let io_err = |source| PipelineError::Io {
        file: dir.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    log::debug!("discovered {} stage files in {}", files.len(), dir.display());
    Ok(files)
}

/// File name without extension.
pub fn identifier_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Read and parse one stage export from disk.
pub fn load_table(path: &Path, options: &LoaderOptions) -> Result<RawTable> {
    let identifier = identifier_for(path);
    let bytes = std::fs::read(path).map_err(|source| PipelineError::Io {
        file: identifier.clone(),
        source,
    })?;
    parse_table(&identifier, &bytes, options)
}

/// Parse the raw bytes of a stage export.
///
/// The file is ISO-8859-1 text; the units row is dropped, the first
/// remaining line is the header and every required column must be present.
pub fn parse_table(identifier: &str, bytes: &[u8], options: &LoaderOptions) -> Result<RawTable> {
    let text = decode_latin1(bytes);
    let body: String = text
        .lines()
        .enumerate()
        .filter(|(i, _)| Some(*i) != options.units_row)
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n");

    let csv_err = |source| PipelineError::Csv {
        file: identifier.to_string(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut index = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in index.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PipelineError::SchemaMismatch {
                file: identifier.to_string(),
                column: name.to_string(),
            })?;
    }

    let source: Arc<str> = Arc::from(identifier);
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result.map_err(csv_err)?;
        let body_line = row.position().map_or(0, |p| p.line() as usize);
        let mut values = [None; REQUIRED_COLUMNS.len()];
        for ((value, &col_idx), name) in values.iter_mut().zip(&index).zip(REQUIRED_COLUMNS) {
            let cell = row.get(col_idx).unwrap_or("");
            *value = parse_cell(cell).ok_or_else(|| PipelineError::NumericParse {
                file: identifier.to_string(),
                line: file_line(body_line, options.units_row),
                column: name.to_string(),
                value: cell.to_string(),
            })?;
        }
        let [y, u_x, u_y, m, q, n] = values;
        records.push(RawRecord {
            source: Arc::clone(&source),
            y,
            u_x,
            u_y,
            m,
            q,
            n,
        });
    }

    log::debug!("{identifier}: read {} rows", records.len());

    Ok(RawTable {
        identifier: identifier.to_string(),
        columns,
        records,
    })
}

/// ISO-8859-1 maps every byte straight to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Map a 1-based line of the parsed body back to its line in the file,
/// counting the dropped units row again.
fn file_line(body_line: usize, units_row: Option<usize>) -> usize {
    let index = body_line.saturating_sub(1);
    match units_row {
        Some(units) if units <= index => index + 2,
        _ => index + 1,
    }
}

/// `Some(None)` for a blank cell, `None` when the text is not a finite number.
fn parse_cell(cell: &str) -> Option<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Header, two rows, the units row at line 3, then the rest of the data.
    fn export_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"Node\tX\tY\tu_x\tu_y\tN\tQ\tM\n");
        bytes.extend_from_slice(b"1\t0.0\t10.0\t-0.0125\t0.002\t-50.0\t3.5\t-12.5\n");
        bytes.extend_from_slice(b"2\t0.0\t9.0\t0.0100\t-0.001\t-48.0\t-2.5\t0.0\n");
        // units row: "[kN m/m]" with a latin-1 superscript two
        bytes.extend_from_slice(b"[-]\t[m]\t[m]\t[m]\t[m]\t[kN/m]\t[kN/m]\t[kN m/m\xb2]\n");
        bytes.extend_from_slice(b"3\t0.0\t8.0\t0.0050\t\t-45.0\t1.0\t4.0\n");
        bytes
    }

    #[test]
    fn parses_rows_and_skips_units_row() {
        let table = parse_table("Wall-1-Initial", &export_bytes(), &LoaderOptions::default()).unwrap();
        assert_eq!(table.identifier, "Wall-1-Initial");
        assert_eq!(table.records.len(), 3);
        assert_eq!(table.columns.len(), 8);

        let first = &table.records[0];
        assert_eq!(&*first.source, "Wall-1-Initial");
        assert_eq!(first.y, Some(10.0));
        assert_eq!(first.u_x, Some(-0.0125));
        assert_eq!(first.m, Some(-12.5));
        assert_eq!(first.n, Some(-50.0));

        let ys: Vec<Option<f64>> = table.records.iter().map(|r| r.y).collect();
        assert_eq!(ys, vec![Some(10.0), Some(9.0), Some(8.0)]);
    }

    #[test]
    fn blank_cells_are_absent() {
        let table = parse_table("Wall-1-Initial", &export_bytes(), &LoaderOptions::default()).unwrap();
        assert_eq!(table.records[2].u_y, None);
        assert_eq!(table.records[2].q, Some(1.0));
    }

    #[test]
    fn decodes_latin1_header_text() {
        let bytes = b"Y\tu_x\tu_y\tM\tQ\tN\tR\xe9f\n1\t0\t0\t0\t0\t0\tx\n";
        let options = LoaderOptions {
            units_row: None,
            ..LoaderOptions::default()
        };
        let table = parse_table("W-1-A", bytes, &options).unwrap();
        assert_eq!(table.columns.last().map(String::as_str), Some("Réf"));
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn missing_column_names_file_and_column() {
        let bytes = b"Y\tu_x\tu_y\tM\tN\n1\t0\t0\t0\t0\n";
        let options = LoaderOptions {
            units_row: None,
            ..LoaderOptions::default()
        };
        let err = parse_table("Wall-2-Dig", bytes, &options).unwrap_err();
        match err {
            PipelineError::SchemaMismatch { file, column } => {
                assert_eq!(file, "Wall-2-Dig");
                assert_eq!(column, "Q");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_cell_is_reported() {
        let bytes = b"Y\tu_x\tu_y\tM\tQ\tN\n1\t0\tabc\t0\t0\t0\n";
        let options = LoaderOptions {
            units_row: None,
            ..LoaderOptions::default()
        };
        let err = parse_table("Wall-2-Dig", bytes, &options).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::NumericParse { ref column, ref value, line: 2, .. }
                if column == "u_y" && value == "abc"
        ));
        assert!(err.to_string().starts_with("Wall-2-Dig: line 2"));
    }

    #[test]
    fn infinite_cell_is_rejected() {
        let bytes = b"Y\tu_x\tu_y\tM\tQ\tN\n0\t-0.01\t0\tinf\t1\t-2\n";
        let options = LoaderOptions {
            units_row: None,
            ..LoaderOptions::default()
        };
        let err = parse_table("Wall-1-Initial", bytes, &options).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::NumericParse { ref column, ref value, .. }
                if column == "M" && value == "inf"
        ));
        for text in ["-inf", "Infinity", "1e999"] {
            assert_eq!(parse_cell(text), None, "{text}");
        }
    }

    #[test]
    fn error_line_counts_header_and_units_row() {
        let mut bytes = export_bytes();
        bytes.extend_from_slice(b"4\t0.0\t7.0\t0.0\t0.0\t-40.0\tbad\t1.0\n");
        let err = parse_table("Wall-1-Initial", &bytes, &LoaderOptions::default()).unwrap_err();
        // header, two rows, units row, one row, then the bad one
        assert!(matches!(
            err,
            PipelineError::NumericParse { line: 6, ref column, .. } if column == "Q"
        ));
    }

    #[test]
    fn discovery_filters_by_extension_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["b-2-B.txt", "a-1-A.TXT", "notes.md", "c-3-C.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let files = discover_stage_files(dir.path(), "txt").unwrap();
        let names: Vec<String> = files.iter().map(|p| identifier_for(p)).collect();
        assert_eq!(names, vec!["a-1-A", "b-2-B", "c-3-C"]);
    }

    #[test]
    fn load_table_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_table(&dir.path().join("Wall-1-A.txt"), &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Io { ref file, .. } if file == "Wall-1-A"));
    }
}
