/// Run configuration loader - parses precip_months.toml
///
/// Keeps file locations, the pivot strategy and logging options out of the
/// code. Every key is optional; anything omitted falls back to the defaults
/// below, which reproduce the classic layout (`precipitation.csv` in,
/// `totals.csv` / `counts.csv` / `monthdata.npz` out, all in the working
/// directory).

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::analysis::pivot::Strategy;
use crate::logging::{ConsoleLogger, LogLevel};

/// Config file looked up in the working directory when nothing else is given.
pub const DEFAULT_CONFIG_PATH: &str = "precip_months.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "PRECIP_MONTHS_CONFIG";

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub pivot: PivotConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("precipitation.csv"),
        }
    }
}

/// Output locations. File names are resolved against `directory`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub totals_file: String,
    pub counts_file: String,
    pub bundle_file: String,
    /// Set to false to skip the `.npz` array bundle.
    pub write_bundle: bool,
    pub json_file: String,
    /// Also write matrices and labels as one JSON document.
    pub write_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            totals_file: "totals.csv".to_string(),
            counts_file: "counts.csv".to_string(),
            bundle_file: "monthdata.npz".to_string(),
            write_bundle: true,
            json_file: "monthdata.json".to_string(),
            write_json: false,
        }
    }
}

impl OutputConfig {
    pub fn totals_path(&self) -> PathBuf {
        self.directory.join(&self.totals_file)
    }

    pub fn counts_path(&self) -> PathBuf {
        self.directory.join(&self.counts_file)
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.directory.join(&self.bundle_file)
    }

    pub fn json_path(&self) -> PathBuf {
        self.directory.join(&self.json_file)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PivotConfig {
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub log_file: Option<PathBuf>,
    pub timestamps: bool,
    /// Stations shown in the debug preview of each matrix (0 disables it).
    pub preview_rows: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            log_file: None,
            timestamps: false,
            preview_rows: 5,
        }
    }
}

impl LoggingConfig {
    pub fn build_logger(&self) -> ConsoleLogger {
        ConsoleLogger::new(self.level, self.log_file.clone(), self.timestamps)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Read { path: PathBuf, source: io::Error },
    /// The file is not valid TOML or has keys of the wrong type.
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Failed to parse {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses configuration text. `origin` only labels error messages.
pub fn parse_config(contents: &str, origin: &Path) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads configuration from `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents, path)
}

/// Like `load_config`, but a missing file yields the defaults.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    match load_config(&path) {
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(Config::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("", Path::new("inline")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.input.path, PathBuf::from("precipitation.csv"));
        assert_eq!(config.output.totals_path(), PathBuf::from("./totals.csv"));
        assert_eq!(config.pivot.strategy, Strategy::GroupBy);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.output.bundle_path(), PathBuf::from("./monthdata.npz"));
        assert!(config.output.write_bundle);
        assert!(!config.output.write_json);
    }

    #[test]
    fn test_partial_config_overrides_only_given_keys() {
        let text = r#"
            [output]
            directory = "out"
            write_bundle = false
            write_json = true

            [pivot]
            strategy = "indexed"

            [logging]
            level = "debug"
        "#;
        let config = parse_config(text, Path::new("inline")).unwrap();

        assert_eq!(config.output.counts_path(), PathBuf::from("out/counts.csv"));
        assert!(!config.output.write_bundle);
        assert_eq!(config.output.bundle_file, "monthdata.npz");
        assert!(config.output.write_json);
        assert_eq!(config.output.json_path(), PathBuf::from("out/monthdata.json"));
        assert_eq!(config.pivot.strategy, Strategy::Indexed);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.preview_rows, 5);
    }

    #[test]
    fn test_unknown_strategy_is_a_parse_error() {
        let err = parse_config("[pivot]\nstrategy = \"pandas\"\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse bad.toml"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(load_config(dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = load_config(Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH))
            .expect("shipped precip_months.toml should parse");
        assert_eq!(config.input.path, PathBuf::from("precipitation.csv"));
        assert_eq!(config.output.bundle_path(), PathBuf::from("./monthdata.npz"));
        assert!(!config.output.write_json);
    }
}
