use super::*;

#[test]
fn test_default_matches_standard_constants() {
    let config = SimConfig::default();

    assert_eq!(config.gravitation, STANDARD_GRAVITY);
    assert_eq!(config.friction_multiplier, FixedNum::from_raw(10_000));
    assert_eq!(config.tick_delta, FixedNum::from_raw(50_000));
}

#[test]
fn test_partial_ron_keeps_defaults() {
    let config = InitialConfig::from_ron_str("(friction_multiplier: 0.25)").expect("valid RON");

    assert_eq!(config.friction_multiplier, 0.25);
    assert_eq!(config.tick_rate, DEFAULT_TICK_RATE);
    assert_eq!(config.gravitation, InitialConfig::default().gravitation);
}

#[test]
fn test_malformed_ron_is_an_error() {
    assert!(InitialConfig::from_ron_str("(gravitation: \"heavy\")").is_err());
}

#[test]
fn test_missing_file_falls_back_to_default() {
    let config = load_initial_config("does/not/exist.ron");
    assert_eq!(config, InitialConfig::default());
}

#[test]
fn test_shipped_config_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/initial_config.ron");
    let contents = std::fs::read_to_string(path).expect("asset present");
    let config = InitialConfig::from_ron_str(&contents).expect("asset parses");

    assert_eq!(SimConfig::from(&config), SimConfig::default());
}

#[test]
fn test_invalid_tick_rate_uses_default() {
    let config = InitialConfig { tick_rate: 0.0, ..InitialConfig::default() };
    assert_eq!(SimConfig::from(&config).tick_delta, FixedNum::from_raw(50_000));
}
