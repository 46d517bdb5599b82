use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.retailers_path,
        PathBuf::from("./data/SNAP_Retailer_Location_data.geojson")
    );
    assert_eq!(cfg.wards_path, PathBuf::from("./data/Wards_from_2022.geojson"));
    assert_eq!(
        cfg.boundary_path,
        PathBuf::from("./data/Washington_DC_Boundary_Stone_Area.geojson")
    );
    assert!(cfg.counties_path.is_none());
    assert!(cfg.bordering_retailers_path.is_none());
    assert_eq!(cfg.categories_path, PathBuf::from("./config/categories.yaml"));
    assert_eq!(cfg.distance_unit, DistanceUnit::Miles);
    assert_eq!(cfg.region_failure_policy, FailurePolicy::Open);
}

#[test]
fn build_app_config_reads_optional_paths() {
    let mut map = HashMap::new();
    map.insert("SNAPMAP_COUNTIES_PATH", "/tmp/counties.geojson");
    map.insert("SNAPMAP_BORDERING_RETAILERS_PATH", "/tmp/md_va.ndjson");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.counties_path,
        Some(PathBuf::from("/tmp/counties.geojson"))
    );
    assert_eq!(
        cfg.bordering_retailers_path,
        Some(PathBuf::from("/tmp/md_va.ndjson"))
    );
}

#[test]
fn build_app_config_treats_blank_optional_path_as_unset() {
    let mut map = HashMap::new();
    map.insert("SNAPMAP_COUNTIES_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.counties_path.is_none());
}

#[test]
fn build_app_config_distance_unit_override() {
    let mut map = HashMap::new();
    map.insert("SNAPMAP_DISTANCE_UNIT", "km");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.distance_unit, DistanceUnit::Kilometers);
}

#[test]
fn build_app_config_distance_unit_invalid() {
    let mut map = HashMap::new();
    map.insert("SNAPMAP_DISTANCE_UNIT", "leagues");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SNAPMAP_DISTANCE_UNIT"),
        "expected InvalidEnvVar(SNAPMAP_DISTANCE_UNIT), got: {result:?}"
    );
}

#[test]
fn build_app_config_failure_policy_override() {
    let mut map = HashMap::new();
    map.insert("SNAPMAP_REGION_FAILURE_POLICY", "closed");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.region_failure_policy, FailurePolicy::Closed);
}

#[test]
fn build_app_config_failure_policy_invalid() {
    let mut map = HashMap::new();
    map.insert("SNAPMAP_REGION_FAILURE_POLICY", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SNAPMAP_REGION_FAILURE_POLICY"),
        "expected InvalidEnvVar(SNAPMAP_REGION_FAILURE_POLICY), got: {result:?}"
    );
}

#[test]
fn app_config_debug_lists_paths() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(debug.contains("retailers_path"));
    assert!(debug.contains("region_failure_policy: Open"));
    assert!(debug.contains("distance_unit: Miles"));
}
