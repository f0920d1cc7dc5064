//! Configuration file loading and validation.
//!
//! The file is optional. When `--config` is not given, `issue-sheet.toml` in
//! the current directory is used if it exists. Command-line flags always
//! override file values.
//!
//! ```toml
//! [labels]
//! pessimistic_prefix = "psp_"
//! optimistic_prefix = "osp_"
//!
//! [output]
//! format = "csv"
//!
//! [logging]
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sheet::LabelPrefix;
use thiserror::Error;
use tracing::debug;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "issue-sheet.toml";

/// Errors produced while loading configuration. The CLI never starts a join
/// with an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {field} '{value}': a label prefix must be non-empty and contain no comma")]
    InvalidPrefix { field: &'static str, value: String },
}

/// Table serialisation format for input detection and output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// A JSON array of row arrays.
    #[default]
    Json,
    /// Comma-separated values, header first.
    Csv,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Story-point label prefixes. Invalid prefixes fail the file parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsConfig {
    pub pessimistic_prefix: Option<LabelPrefix>,
    pub optimistic_prefix: Option<LabelPrefix>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: Option<TableFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: Option<LogFormat>,
}

/// The contents of a configuration file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub labels: LabelsConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl FileConfig {
    /// Parses configuration text. `origin` is used in error messages only.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Log format to install, falling back to [`LogFormat::Pretty`].
    pub fn log_format(&self) -> LogFormat {
        self.logging.format.unwrap_or_default()
    }

    /// Output format after applying a command-line override.
    pub fn table_format(&self, flag: Option<TableFormat>) -> TableFormat {
        flag.or(self.output.format).unwrap_or_default()
    }

    /// Resolves the story-point prefixes, command-line flags first.
    ///
    /// File values were validated when the file was parsed; only the flags
    /// are checked here.
    pub fn label_prefixes(
        &self,
        pessimistic_flag: Option<String>,
        optimistic_flag: Option<String>,
    ) -> Result<(Option<LabelPrefix>, Option<LabelPrefix>), ConfigError> {
        let pessimistic = validate_prefix("pessimistic_prefix", pessimistic_flag)?
            .or_else(|| self.labels.pessimistic_prefix.clone());
        let optimistic = validate_prefix("optimistic_prefix", optimistic_flag)?
            .or_else(|| self.labels.optimistic_prefix.clone());
        Ok((pessimistic, optimistic))
    }
}

fn validate_prefix(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<LabelPrefix>, ConfigError> {
    value
        .map(|v| LabelPrefix::new(v.clone()).ok_or(ConfigError::InvalidPrefix { field, value: v }))
        .transpose()
}

/// Loads configuration from `explicit`, or from [`DEFAULT_CONFIG_FILE`] when
/// it exists. An explicitly named file must exist.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(FileConfig::default());
            }
            default
        }
    };

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = FileConfig::parse(&text, &path)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> FileConfig {
        FileConfig::parse(text, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = parse("");
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.log_format(), LogFormat::Pretty);
        assert_eq!(config.table_format(None), TableFormat::Json);
    }

    #[test]
    fn reads_every_section() {
        let config = parse(
            r#"
            [labels]
            pessimistic_prefix = "psp_"
            optimistic_prefix = "osp_"

            [output]
            format = "csv"

            [logging]
            format = "json"
            "#,
        );
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.table_format(None), TableFormat::Csv);

        let (psp, osp) = config.label_prefixes(None, None).unwrap();
        assert_eq!(psp.map(String::from), Some("psp_".to_string()));
        assert_eq!(osp.map(String::from), Some("osp_".to_string()));
    }

    #[test]
    fn flags_override_file_values() {
        let config = parse("[labels]\npessimistic_prefix = \"psp_\"\n[output]\nformat = \"csv\"\n");
        assert_eq!(config.table_format(Some(TableFormat::Json)), TableFormat::Json);

        let (psp, osp) = config
            .label_prefixes(Some("pess-".to_string()), None)
            .unwrap();
        assert_eq!(psp.map(String::from), Some("pess-".to_string()));
        assert_eq!(osp, None);
    }

    #[test]
    fn invalid_prefix_flag_is_rejected() {
        let err = FileConfig::default()
            .label_prefixes(None, Some("a,b".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPrefix { field: "optimistic_prefix", ref value } if value == "a,b"
        ));
    }

    #[test]
    fn invalid_prefix_in_file_is_a_parse_error() {
        let err = FileConfig::parse("[labels]\noptimistic_prefix = \"a,b\"\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert!(source.is_some_and(|message| message.contains("invalid label prefix 'a,b'")));

        let err = FileConfig::parse("[labels]\npessimistic_prefix = \"\"\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_keys_are_a_parse_error() {
        let err = FileConfig::parse("[labels]\nprefix = \"x\"\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn explicit_missing_file_is_a_read_error() {
        let err = load(Some(Path::new("/nonexistent/issue-sheet.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
