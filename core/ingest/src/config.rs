//! FILENAME: core/ingest/src/config.rs
//! Loads named filter configurations from JSON files.
//!
//! Convention: one file per filter name under a config directory,
//! `<dir>/<name>.json`, deserialized straight into `FilterConfig`.

use std::fs;
use std::path::Path;

use table::FilterConfig;

use crate::error::IngestError;

/// Loads `<dir>/<name>.json`.
pub fn load_filter_config(dir: impl AsRef<Path>, name: &str) -> Result<FilterConfig, IngestError> {
    let path = dir.as_ref().join(format!("{name}.json"));
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loads_config_by_name() {
        let dir = std::env::temp_dir().join("ingest-config-test");
        fs::create_dir_all(&dir).unwrap();
        let mut file = fs::File::create(dir.join("dayparts.json")).unwrap();
        write!(
            file,
            r#"{{"title": "Dayparts", "demographic": "Persons 18+", "daypart": ["Prime", "Total Day"]}}"#
        )
        .unwrap();

        let config = load_filter_config(&dir, "dayparts").unwrap();
        assert_eq!(config.title.as_deref(), Some("Dayparts"));
        assert_eq!(table::group_column(&config), Some("daypart"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_filter_config(std::env::temp_dir(), "no-such-filter").unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
