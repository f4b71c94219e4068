use crate::core::scan_bound::DEFAULT_LOOKBACK;
use crate::core::ConfigProvider;
use crate::domain::model::{ColumnMap, MalformedRowPolicy};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INPUT_PATH: &str = "REPORT.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "reviewReport.json";

/// Run settings. Every section may be left out of the file; a missing file
/// altogether is `TomlConfig::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub columns: ColumnMap,
    pub scan: ScanConfig,
    pub error_handling: ErrorHandlingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input_path: String,
    pub output_path: String,
    pub indent: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: DEFAULT_INPUT_PATH.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            indent: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub default_lookback: usize,
    pub preview_count: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_lookback: DEFAULT_LOOKBACK,
            preview_count: 16,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorHandlingConfig {
    pub on_malformed_row: MalformedRowPolicy,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string, after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli(&mut self, cli: &crate::config::CliConfig) {
        if let Some(input) = &cli.input {
            self.report.input_path = input.clone();
        }
        if let Some(output) = &cli.output {
            self.report.output_path = output.clone();
        }
        if let Some(policy) = cli.on_malformed {
            self.error_handling.on_malformed_row = policy;
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("report.input_path", &self.report.input_path)?;
        validation::validate_path("report.output_path", &self.report.output_path)?;
        validation::validate_range("report.indent", self.report.indent, 0, 16)?;
        validation::validate_positive_number("scan.default_lookback", self.scan.default_lookback, 1)?;

        if self.report.input_path == self.report.output_path {
            return Err(EtlError::ConfigValidationError {
                field: "report.output_path".to_string(),
                message: "output would overwrite the input report".to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.report.input_path
    }

    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    fn malformed_row_policy(&self) -> MalformedRowPolicy {
        self.error_handling.on_malformed_row
    }

    fn indent(&self) -> usize {
        self.report.indent
    }

    fn default_lookback(&self) -> usize {
        self.scan.default_lookback
    }

    fn preview_count(&self) -> usize {
        self.scan.preview_count
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.input_path(), "REPORT.csv");
        assert_eq!(config.output_path(), "reviewReport.json");
        assert_eq!(config.indent(), 4);
        assert_eq!(config.default_lookback(), 2);
        assert_eq!(config.preview_count(), 16);
        assert_eq!(config.malformed_row_policy(), MalformedRowPolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[report]
output_path = "queue/review.json"
indent = 2

[columns]
tool = 3
tech_secondary = 40

[error_handling]
on_malformed_row = "skip"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.input_path(), "REPORT.csv");
        assert_eq!(config.output_path(), "queue/review.json");
        assert_eq!(config.indent(), 2);
        assert_eq!(config.columns.tool, 3);
        assert_eq!(config.columns.chamber, 9);
        assert_eq!(config.columns.required_width(), 41);
        assert_eq!(config.malformed_row_policy(), MalformedRowPolicy::Skip);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let toml_content = r#"
[error_handling]
on_malformed_row = "retry"
"#;
        let err = TomlConfig::from_toml_str(toml_content).unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REVIEW_QUEUE_TEST_REPORT", "daily/REPORT-0304.csv");

        let toml_content = r#"
[report]
input_path = "${REVIEW_QUEUE_TEST_REPORT}"
output_path = "${REVIEW_QUEUE_TEST_UNSET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.report.input_path, "daily/REPORT-0304.csv");
        assert_eq!(config.report.output_path, "${REVIEW_QUEUE_TEST_UNSET}");

        std::env::remove_var("REVIEW_QUEUE_TEST_REPORT");
    }

    #[test]
    fn test_config_validation() {
        let mut config = TomlConfig::default();
        config.scan.default_lookback = 0;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.report.indent = 40;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.report.output_path = "REPORT.csv".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[scan]
default_lookback = 7
preview_count = 0
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.default_lookback(), 7);
        assert_eq!(config.preview_count(), 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TomlConfig::from_file("/nonexistent/review-queue.toml").unwrap_err();
        assert!(matches!(err, EtlError::IoError(_)));
    }
}
