//! Rules document loading

use crate::error::Result;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Load the rules configuration from a YAML document.
///
/// A blank or null document yields an empty mapping, which the engine
/// treats as the modern schema with every default.
pub fn load_rules(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let value: Value = serde_yaml::from_str(&text)?;
    info!(path = %path.display(), "rules configuration loaded");
    Ok(match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_yaml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_blank_document_is_empty_mapping() {
        let file = write_yaml("   \n");
        let value = load_rules(file.path()).unwrap();
        assert_eq!(value, Value::Object(Map::new()));
    }

    #[test]
    fn test_legacy_document_round_trips() {
        let file =
            write_yaml("rules:\n  - id: big\n    field: amount\n    operator: greater_than\n    value: 10000\n");
        let value = load_rules(file.path()).unwrap();
        assert!(value.get("rules").unwrap().is_array());
    }

    #[test]
    fn test_modern_document() {
        let file =
            write_yaml("thresholds:\n  large_txn_usd: 20000\nhigh_risk_countries: [IR, KP]\n");
        let value = load_rules(file.path()).unwrap();
        assert_eq!(value["thresholds"]["large_txn_usd"], 20000);
    }
}
