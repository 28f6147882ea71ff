#![allow(clippy::unwrap_used)]

mod test_module;

use ::config::ConfigError;
use router_env::TelemetryGuard;

use self::test_module::fn_with_colon;

fn logger() -> error_stack::Result<&'static TelemetryGuard, ConfigError> {
    use once_cell::sync::OnceCell;

    static INSTANCE: OnceCell<TelemetryGuard> = OnceCell::new();
    Ok(INSTANCE.get_or_init(|| {
        let config = router_env::Config::new().unwrap();

        router_env::setup(&config.log, "router_env_test", ["router_env", "logger"])
    }))
}

#[tokio::test]
async fn basic() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logger()?;

    fn_with_colon(13).await;

    Ok(())
}

#[test]
fn tag_round_trips_through_strings() {
    use std::str::FromStr;

    let tag = router_env::Tag::from_str("Encryption").unwrap();
    assert_eq!(tag, router_env::Tag::Encryption);
    assert_eq!(tag.to_string(), "Encryption");
}

#[test]
fn default_log_config_enables_console_only() {
    let log = router_env::config::Log::default();
    assert!(log.console.enabled);
    assert!(!log.file.enabled);
    assert_eq!(log.console.log_format, router_env::config::LogFormat::Default);
}
