//! Config tests. Env-mutating, so serialized.

use serial_test::serial;
use std::env;
use std::time::Duration;
use tracer_bot::AppConfig;
use tracer_core::TracerError;

const VARS: &[&str] = &[
    "TG_TOKEN",
    "VK_TOKEN",
    "OWNER_ID",
    "TELEGRAM_API_URL",
    "TELOXIDE_API_URL",
    "VK_API_URL",
    "LOG_FILE",
    "TRACK_INTERVAL_SECS",
];

fn reset_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

fn set_required() {
    env::set_var("TG_TOKEN", "123456:telegram-token");
    env::set_var("VK_TOKEN", "vk-service-token");
    env::set_var("OWNER_ID", "42");
}

fn config_error(result: Result<AppConfig, TracerError>) -> String {
    match result {
        Err(TracerError::Config(msg)) => msg,
        Err(other) => panic!("expected config error, got {:?}", other),
        Ok(_) => panic!("expected config error, got Ok"),
    }
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    reset_env();
    set_required();

    let config = AppConfig::load(None, None).unwrap();

    assert_eq!(config.tg_token, "123456:telegram-token");
    assert_eq!(config.vk_token, "vk-service-token");
    assert_eq!(config.owner_id, 42);
    assert!(config.telegram_api_url.is_none());
    assert_eq!(config.vk_api_url, "https://api.vk.com/method");
    assert_eq!(config.log_file, "logs/vk-tracer.log");
    assert_eq!(config.track_interval, Duration::from_secs(7));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    reset_env();
    set_required();
    env::set_var("TELOXIDE_API_URL", "http://localhost:8081");
    env::set_var("VK_API_URL", "http://localhost:9000/method");
    env::set_var("LOG_FILE", "/tmp/tracer.log");
    env::set_var("TRACK_INTERVAL_SECS", "30");

    let config = AppConfig::load(Some("999:override".into()), Some("vk-override".into())).unwrap();

    assert_eq!(config.tg_token, "999:override");
    assert_eq!(config.vk_token, "vk-override");
    assert_eq!(
        config.telegram_api_url.as_deref(),
        Some("http://localhost:8081")
    );
    assert_eq!(config.vk_api_url, "http://localhost:9000/method");
    assert_eq!(config.log_file, "/tmp/tracer.log");
    assert_eq!(config.track_interval, Duration::from_secs(30));
    reset_env();
}

#[test]
#[serial]
fn test_missing_required_values() {
    reset_env();
    assert_eq!(config_error(AppConfig::load(None, None)), "TG_TOKEN not specified");

    env::set_var("TG_TOKEN", "123456:telegram-token");
    env::set_var("VK_TOKEN", "  ");
    assert_eq!(config_error(AppConfig::load(None, None)), "VK_TOKEN not specified");

    env::set_var("VK_TOKEN", "vk-service-token");
    assert_eq!(config_error(AppConfig::load(None, None)), "OWNER_ID not specified");
    reset_env();
}

#[test]
#[serial]
fn test_owner_id_must_be_a_number() {
    reset_env();
    set_required();
    env::set_var("OWNER_ID", "durov");

    assert_eq!(
        config_error(AppConfig::load(None, None)),
        "OWNER_ID must be a number"
    );
    reset_env();
}

#[test]
#[serial]
fn test_invalid_interval_falls_back_to_default() {
    reset_env();
    set_required();
    env::set_var("TRACK_INTERVAL_SECS", "0");
    assert_eq!(
        AppConfig::load(None, None).unwrap().track_interval,
        Duration::from_secs(7)
    );
    env::set_var("TRACK_INTERVAL_SECS", "soon");
    assert_eq!(
        AppConfig::load(None, None).unwrap().track_interval,
        Duration::from_secs(7)
    );
    reset_env();
}

#[test]
#[serial]
fn test_validate_rejects_bad_urls() {
    reset_env();
    set_required();
    env::set_var("TELEGRAM_API_URL", "not a url");
    let config = AppConfig::load(None, None).unwrap();
    assert!(matches!(config.validate(), Err(TracerError::Config(_))));

    env::remove_var("TELEGRAM_API_URL");
    env::set_var("VK_API_URL", "::::");
    let config = AppConfig::load(None, None).unwrap();
    assert!(matches!(config.validate(), Err(TracerError::Config(_))));
    reset_env();
}

#[test]
#[serial]
fn test_debug_masks_tokens() {
    reset_env();
    set_required();
    let config = AppConfig::load(None, None).unwrap();
    let printed = format!("{:?}", config);
    assert!(!printed.contains("telegram-token"));
    assert!(!printed.contains("vk-service-token"));
    reset_env();
}
