//! Configuration loading functionality.
//!
//! Scoring constants ship with canonical defaults; a YAML file may
//! override any subset of them.

use std::fs;
use std::path::Path;

use crate::error::{AuditError, AuditResult};

use super::types::ScoringConfig;

/// Loads a [`ScoringConfig`] from a YAML file.
///
/// Any field absent from the file keeps its default value, so a file
/// overriding a single threshold is valid.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file cannot be read and
/// `ConfigParseError` if it is not valid YAML for the config shape.
///
/// # Example
///
/// ```no_run
/// use audit_engine::config::load_scoring_config;
///
/// let config = load_scoring_config("./config/scoring.yaml")?;
/// # Ok::<(), audit_engine::error::AuditError>(())
/// ```
pub fn load_scoring_config<P: AsRef<Path>>(path: P) -> AuditResult<ScoringConfig> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| AuditError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| AuditError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_load_missing_file_returns_config_not_found() {
        let result = load_scoring_config("/nonexistent/scoring.yaml");
        assert!(matches!(
            result,
            Err(AuditError::ConfigNotFound { path }) if path.contains("scoring.yaml")
        ));
    }

    #[test]
    fn test_load_override_file() {
        let dir = std::env::temp_dir().join("audit-engine-config-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scoring.yaml");
        fs::write(&path, "allocations:\n  gst: 30\n  tds: 15\n").unwrap();

        let config = load_scoring_config(&path).unwrap();
        assert_eq!(config.allocations.gst, Decimal::from(30));
        assert_eq!(config.allocations.tds, Decimal::from(15));
        // Untouched values keep their defaults.
        assert_eq!(config.allocations.data_integrity, Decimal::from(15));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_invalid_yaml_returns_parse_error() {
        let dir = std::env::temp_dir().join("audit-engine-config-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.yaml");
        fs::write(&path, "allocations: [not, a, map]").unwrap();

        let result = load_scoring_config(&path);
        assert!(matches!(result, Err(AuditError::ConfigParseError { .. })));

        fs::remove_file(&path).unwrap();
    }
}
