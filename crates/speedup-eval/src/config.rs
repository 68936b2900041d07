//! Configuration for an evaluation run
//!
//! Every setting has a default matching the layout produced by the
//! measurement scripts, so an empty file (or no file at all) is a valid
//! configuration. A TOML file can override any subset:
//!
//! ```toml
//! [input]
//! delimiter = ";"
//! init_column = "time_init"
//! sort_column = "time_sort"
//!
//! [output]
//! table_file = "table.csv"
//! charts = false
//!
//! [chart]
//! width = 1024
//! height = 768
//! ```

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input discovery and CSV parsing
    #[serde(default)]
    pub input: InputConfig,
    /// Names of the artifacts written into each scenario directory
    #[serde(default)]
    pub output: OutputConfig,
    /// Chart geometry
    #[serde(default)]
    pub chart: ChartConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - A value fails validation (see [`Config::validate`])
    ///
    /// # Example
    ///
    /// ```no_run
    /// use speedup_eval::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("evaluate.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use speedup_eval::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_str("[output]\ncharts = false")?;
    /// assert!(!config.output.charts);
    /// assert_eq!(config.input.delimiter, ";");
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check constraints serde cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.input.delimiter.len() != 1 {
            bail!(
                "input.delimiter must be a single ASCII character, got {:?}",
                self.input.delimiter
            );
        }
        if self.input.init_column == self.input.sort_column {
            bail!("input.init_column and input.sort_column must differ");
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            bail!("chart dimensions must be non-zero");
        }
        Ok(())
    }
}

/// Where input files are found and how they are parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Field delimiter of measurement files (single byte)
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Extension of measurement files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Files whose name contains this marker are previous outputs, not inputs
    #[serde(default = "default_exclude_marker")]
    pub exclude_marker: String,
    /// Column holding the initialization time of each trial
    #[serde(default = "default_init_column")]
    pub init_column: String,
    /// Column holding the sorting time of each trial
    #[serde(default = "default_sort_column")]
    pub sort_column: String,
}

impl InputConfig {
    /// Delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b';')
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            extension: default_extension(),
            exclude_marker: default_exclude_marker(),
            init_column: default_init_column(),
            sort_column: default_sort_column(),
        }
    }
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_extension() -> String {
    "csv".to_string()
}

fn default_exclude_marker() -> String {
    "table".to_string()
}

fn default_init_column() -> String {
    "time_init".to_string()
}

fn default_sort_column() -> String {
    "time_sort".to_string()
}

/// Artifacts written into each scenario directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Comparison table file name
    #[serde(default = "default_table_file")]
    pub table_file: String,
    /// Speedup chart file name; the extension selects the image format
    #[serde(default = "default_speedup_chart")]
    pub speedup_chart: String,
    /// Efficiency chart file name
    #[serde(default = "default_efficiency_chart")]
    pub efficiency_chart: String,
    /// Whether charts are rendered at all
    #[serde(default = "default_charts")]
    pub charts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            table_file: default_table_file(),
            speedup_chart: default_speedup_chart(),
            efficiency_chart: default_efficiency_chart(),
            charts: default_charts(),
        }
    }
}

fn default_table_file() -> String {
    "table.csv".to_string()
}

fn default_speedup_chart() -> String {
    "plot_speedup.jpg".to_string()
}

fn default_efficiency_chart() -> String {
    "plot_efficiency.jpg".to_string()
}

fn default_charts() -> bool {
    true
}

/// Chart size in pixels (default 7x5 inches at 100 dpi)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    700
}

fn default_height() -> u32 {
    500
}
