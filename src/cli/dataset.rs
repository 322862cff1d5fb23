use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{AvailabilityInterval, LineItem};
use crate::errors::CoreResult;

/// Records the CLI operates on, as exported from the dashboard's tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub availability: Vec<AvailabilityInterval>,
}

impl Dataset {
    pub fn load(path: &Path) -> CoreResult<Self> {
        let data = fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&data)?;
        debug!(
            path = %path.display(),
            line_items = dataset.line_items.len(),
            availability = dataset.availability.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreError;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_sections_default_to_empty() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"{"line_items": []}"#).unwrap();
        let dataset = Dataset::load(file.path()).unwrap();
        assert!(dataset.availability.is_empty());
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "{not json").unwrap();
        assert!(matches!(Dataset::load(file.path()), Err(CoreError::Serde(_))));
    }
}
