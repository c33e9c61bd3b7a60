use std::path::Path;

use serde::{Deserialize, Serialize};

use pcd_core::pointcloud::codec::DEFAULT_PARALLEL_MIN_LEN;
use pcd_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudOptions {
    /// Optional fixed seed for reproducible sampling.
    pub random_seed: Option<u64>,
    /// Minimum number of points per rayon job when decoding.
    pub parallel_min_len: usize,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            random_seed: None,
            parallel_min_len: DEFAULT_PARALLEL_MIN_LEN,
        }
    }
}

impl CloudOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| Error::format(format!("invalid options: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: CloudOptions = serde_json::from_str(r#"{"random_seed": 9}"#).unwrap();
        assert_eq!(options, CloudOptions::default().with_seed(9));
    }

    #[test]
    fn loads_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"parallel_min_len": 16}"#).unwrap();
        let options = CloudOptions::from_json_file(&path).unwrap();
        assert_eq!(options.parallel_min_len, 16);
        assert_eq!(options.random_seed, None);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            CloudOptions::from_json_file(&path),
            Err(Error::Format(_))
        ));
    }
}
