//! Sensitive Data Demo
//!
//! Shows how redaction changes what reaches the sink. The same login request
//! is sent twice: once with the default key set (masked) and once with
//! redaction disabled (logged verbatim). The endpoint does not exist, so both
//! calls fail and are logged with the failure tag (at TRACE, since the
//! console sink supports every level).
//!
//! Settings can also come from the environment, e.g.
//! `PHOENIX_HTTP_OBSERVER_CONTEXT=LoginClient`.

use http_observer::config::ObserverConfig;
use http_observer::{ConsoleSink, HttpClientBuilder, SensitiveKeys};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = ObserverConfig::from_env()?;
    let credentials = json!({"username": "user", "password": "secret123"});

    println!("Masked");
    println!("------");
    let client = HttpClientBuilder::from_config(&config)
        .logger(ConsoleSink::new(config.context.clone()))
        .sensitive_keys(SensitiveKeys::default().with_key("username"))
        .build()?;
    if let Err(e) = client
        .post::<Value>("https://api.example.com/login", Some(credentials.clone()), None)
        .await
    {
        println!("Login failed: {}\n", e);
    }

    println!("Verbatim");
    println!("--------");
    let client = HttpClientBuilder::from_config(&config)
        .logger(ConsoleSink::new(config.context.clone()))
        .remove_sensitive_data(false)
        .build()?;
    if let Err(e) = client
        .post::<Value>("https://api.example.com/login", Some(credentials), None)
        .await
    {
        println!("Login failed: {}", e);
    }

    Ok(())
}
