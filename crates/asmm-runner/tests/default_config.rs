//! Runs the shipped configuration end to end.

use asmm_runner::{AppConfig, Application};

const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");

#[test]
fn test_shipped_config_matches_defaults() {
    let config = AppConfig::from_file(DEFAULT_CONFIG).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_shipped_config_runs() {
    let config = AppConfig::from_file(DEFAULT_CONFIG).unwrap();
    let steps = config.feed.steps as u64;
    let max_inventory = config.strategy.max_inventory;

    let result = Application::new(config).unwrap().run().unwrap();

    assert_eq!(result.steps, steps);
    assert_eq!(result.final_position, result.net_traded());
    assert!(result.final_position.abs() <= max_inventory);
    assert!(!result.cycles.is_empty());
    // Only orders that filled on placement produce trades.
    assert!(result.trades.len() <= result.orders.len());
}
