//! JSON file helpers shared by the commands.

use crate::error::{CliError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;

/// Read and deserialize a JSON file.
///
/// A missing file is reported as [`CliError::FileNotFound`] so the message
/// names the path rather than the OS error.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Serialize a value as pretty-printed JSON and write it out.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let mut contents = serde_json::to_string_pretty(value)?;
    contents.push('\n');
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");

        write_json(&path, &json!([{"id": "E1"}])).unwrap();
        let value: Value = read_json(&path).unwrap();
        assert_eq!(value, json!([{"id": "E1"}]));
    }

    #[test]
    fn test_missing_file() {
        let result: Result<Value> = read_json("/nonexistent/emails.json");
        match result {
            Err(CliError::FileNotFound(path)) => assert!(path.ends_with("emails.json")),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{").unwrap();

        let result: Result<Value> = read_json(&path);
        assert!(matches!(result, Err(CliError::Serialization(_))));
    }
}
