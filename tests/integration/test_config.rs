// Integration tests for configuration loading from the process environment

use estate_user_admin::config::Config;
use estate_user_admin::core::errors::AdminError;
use std::env;
use std::sync::Mutex;

// Global mutex to serialize environment variable access in tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_all_env_vars() {
    for key in [
        "BIND_ADDRESS",
        "PORT",
        "SUPABASE_URL",
        "SUPABASE_SERVICE_ROLE_KEY",
        "DATABASE_URL",
        "UPSTREAM_TIMEOUT_SECS",
        "BODY_SIZE_LIMIT_BYTES",
        "LOG_LEVEL",
        "LOG_FORMAT",
    ] {
        env::remove_var(key);
    }
}

#[test]
fn test_config_from_env_success() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_all_env_vars();

    env::set_var("SUPABASE_URL", "https://project.supabase.co");
    env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service-key");
    env::set_var("PORT", "9090");
    env::set_var("BODY_SIZE_LIMIT_BYTES", "2048");
    env::set_var("LOG_FORMAT", "text");

    let config = Config::from_env().unwrap();
    assert_eq!(config.port, 9090);
    assert_eq!(config.body_size_limit_bytes, 2048);
    assert_eq!(config.log_format, "text");
    assert_eq!(config.supabase_url, "https://project.supabase.co");

    clear_all_env_vars();
}

#[test]
fn test_config_from_env_missing_key() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_all_env_vars();

    env::set_var("SUPABASE_URL", "https://project.supabase.co");

    let err = Config::from_env().unwrap_err();
    assert_eq!(
        err,
        AdminError::ConfigurationError("SUPABASE_SERVICE_ROLE_KEY not set".to_string())
    );

    clear_all_env_vars();
}

#[test]
fn test_config_from_env_invalid_log_format() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_all_env_vars();

    env::set_var("SUPABASE_URL", "https://project.supabase.co");
    env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service-key");
    env::set_var("LOG_FORMAT", "xml");

    assert!(matches!(
        Config::from_env(),
        Err(AdminError::ConfigurationError(_))
    ));

    clear_all_env_vars();
}
