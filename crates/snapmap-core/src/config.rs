use crate::app_config::{AppConfig, Environment};
use crate::units::{DistanceUnit, FailurePolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the process environment
/// so tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    };

    let parse_unit = |var: &str, default: &str| -> Result<DistanceUnit, ConfigError> {
        or_default(var, default)
            .parse::<DistanceUnit>()
            .map_err(|reason| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason,
            })
    };

    let parse_policy = |var: &str, default: &str| -> Result<FailurePolicy, ConfigError> {
        or_default(var, default)
            .parse::<FailurePolicy>()
            .map_err(|reason| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason,
            })
    };

    let env = parse_environment(&or_default("SNAPMAP_ENV", "development"));
    let log_level = or_default("SNAPMAP_LOG_LEVEL", "info");

    let retailers_path = PathBuf::from(or_default(
        "SNAPMAP_RETAILERS_PATH",
        "./data/SNAP_Retailer_Location_data.geojson",
    ));
    let wards_path = PathBuf::from(or_default(
        "SNAPMAP_WARDS_PATH",
        "./data/Wards_from_2022.geojson",
    ));
    let boundary_path = PathBuf::from(or_default(
        "SNAPMAP_BOUNDARY_PATH",
        "./data/Washington_DC_Boundary_Stone_Area.geojson",
    ));
    let counties_path = optional_path("SNAPMAP_COUNTIES_PATH");
    let bordering_retailers_path = optional_path("SNAPMAP_BORDERING_RETAILERS_PATH");
    let categories_path = PathBuf::from(or_default(
        "SNAPMAP_CATEGORIES_PATH",
        "./config/categories.yaml",
    ));

    let distance_unit = parse_unit("SNAPMAP_DISTANCE_UNIT", "miles")?;
    let region_failure_policy = parse_policy("SNAPMAP_REGION_FAILURE_POLICY", "open")?;

    Ok(AppConfig {
        env,
        log_level,
        retailers_path,
        wards_path,
        boundary_path,
        counties_path,
        bordering_retailers_path,
        categories_path,
        distance_unit,
        region_failure_policy,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
