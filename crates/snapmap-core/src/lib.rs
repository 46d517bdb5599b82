pub mod app_config;
pub mod categories;
pub mod config;
pub mod units;

pub use app_config::{AppConfig, Environment};
pub use categories::{
    load_categories, load_categories_or_default, Category, CategoryStyle, CategoryTable,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use units::{DistanceUnit, FailurePolicy};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file: {0}")]
    CategoriesFileParse(#[from] serde_yaml::Error),

    #[error("category validation failed: {0}")]
    Validation(String),
}
