//! Bundled demo catalog: five learners, ten courses, fourteen interactions

use crate::models::Dataset;

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

impl Dataset {
    /// Parse the bundled demo dataset
    pub fn sample() -> Result<Self, serde_json::Error> {
        serde_json::from_str(SAMPLE_CATALOG)
    }
}
