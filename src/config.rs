use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::LoaderOptions;
use crate::data::pipeline::PipelineOptions;
use crate::data::transform::DISPLACEMENT_SCALE;

/// How stage exports are found and parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Folder scanned for stage exports (PLAXIS drops them in Downloads).
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,

    /// Extension of stage export files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Field separator.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Zero-based line index of the units row; `null` keeps every line.
    #[serde(default = "default_units_row")]
    pub units_row: Option<usize>,

    /// Factor applied to `u_x` / `u_y` (metres to millimetres).
    #[serde(default = "default_displacement_scale")]
    pub displacement_scale: f64,
}

fn default_input_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("Downloads"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_extension() -> String {
    "txt".to_string()
}

fn default_delimiter() -> char {
    '\t'
}

fn default_units_row() -> Option<usize> {
    Some(3)
}

fn default_displacement_scale() -> f64 {
    DISPLACEMENT_SCALE
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            extension: default_extension(),
            delimiter: default_delimiter(),
            units_row: default_units_row(),
            displacement_scale: default_displacement_scale(),
        }
    }
}

/// Output artifacts and presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Figure file name, written into the input folder.
    #[serde(default = "default_figure_name")]
    pub figure_name: String,

    /// Summary CSV file name; `null` disables the export.
    #[serde(default = "default_summary_name")]
    pub summary_name: Option<String>,

    #[serde(default = "default_figure_width")]
    pub figure_width: u32,

    #[serde(default = "default_figure_height")]
    pub figure_height: u32,

    /// Decimals shown in the summary table.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Sort each plotted series by depth instead of file row order.
    #[serde(default)]
    pub sort_by_depth: bool,

    /// Write the figure and summary after every successful load.
    #[serde(default = "default_export_on_load")]
    pub export_on_load: bool,
}

fn default_figure_name() -> String {
    "Plaxis graph.png".to_string()
}

fn default_summary_name() -> Option<String> {
    Some("Plaxis summary.csv".to_string())
}

fn default_figure_width() -> u32 {
    2400
}

fn default_figure_height() -> u32 {
    1440
}

fn default_precision() -> usize {
    1
}

fn default_export_on_load() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            figure_name: default_figure_name(),
            summary_name: default_summary_name(),
            figure_width: default_figure_width(),
            figure_height: default_figure_height(),
            precision: default_precision(),
            sort_by_depth: false,
            export_on_load: default_export_on_load(),
        }
    }
}

/// Application configuration, read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.input.delimiter.is_ascii(),
            "input.delimiter must be a single ASCII character, got {:?}",
            self.input.delimiter
        );
        anyhow::ensure!(
            self.output.figure_width > 0 && self.output.figure_height > 0,
            "output figure size must be non-zero"
        );
        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            loader: LoaderOptions {
                delimiter: self.input.delimiter as u8,
                units_row: self.input.units_row,
            },
            displacement_scale: self.input.displacement_scale,
        }
    }

    pub fn figure_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.output.figure_name)
    }

    pub fn summary_path(&self, dir: &Path) -> Option<PathBuf> {
        self.output.summary_name.as_ref().map(|name| dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_plaxis_exports() {
        let config = AppConfig::default();
        assert_eq!(config.input.extension, "txt");
        assert_eq!(config.input.units_row, Some(3));
        assert_eq!(config.output.figure_name, "Plaxis graph.png");
        assert!(config.input.dir.ends_with("Downloads") || config.input.dir == PathBuf::from("."));

        let options = config.pipeline_options();
        assert_eq!(options.loader.delimiter, b'\t');
        assert_eq!(options.displacement_scale, 1000.0);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(br#"{"input": {"dir": "/data/plaxis", "units_row": null}, "output": {"precision": 0}}"#)
            .unwrap();
        let config = AppConfig::load(temp.path()).unwrap();
        assert_eq!(config.input.dir, PathBuf::from("/data/plaxis"));
        assert_eq!(config.input.units_row, None);
        assert_eq!(config.input.delimiter, '\t');
        assert_eq!(config.output.precision, 0);
        assert!(config.output.export_on_load);
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all("{\"input\": {\"delimiter\": \"§\"}}".as_bytes()).unwrap();
        let err = AppConfig::load(temp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("delimiter"));
    }

    #[test]
    fn save_then_load() {
        let temp = NamedTempFile::new().unwrap();
        let mut config = AppConfig::default();
        config.output.sort_by_depth = true;
        config.save(temp.path()).unwrap();
        assert_eq!(AppConfig::load(temp.path()).unwrap(), config);
    }

    #[test]
    fn output_paths_live_in_input_dir() {
        let config = AppConfig::default();
        let dir = Path::new("/data/plaxis");
        assert_eq!(config.figure_path(dir), dir.join("Plaxis graph.png"));
        assert_eq!(config.summary_path(dir), Some(dir.join("Plaxis summary.csv")));
    }
}
