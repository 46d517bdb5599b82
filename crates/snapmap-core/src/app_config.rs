use std::path::PathBuf;

use crate::units::{DistanceUnit, FailurePolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub retailers_path: PathBuf,
    pub wards_path: PathBuf,
    pub boundary_path: PathBuf,
    /// Bordering-area polygons (counties). Optional dataset.
    pub counties_path: Option<PathBuf>,
    /// Retailers outside the jurisdiction, shown when bordering areas are included.
    pub bordering_retailers_path: Option<PathBuf>,
    pub categories_path: PathBuf,
    pub distance_unit: DistanceUnit,
    pub region_failure_policy: FailurePolicy,
}
