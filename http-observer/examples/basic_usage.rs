//! Basic Usage Demo
//!
//! This example walks through the common ways to set up an observed client
//! against the public JSONPlaceholder API:
//!
//! 1. No logging at all
//! 2. Logging to the default console sink
//! 3. A custom sink that only handles trace and error
//! 4. A base URL with relative paths
//!
//! Run with `RUST_LOG=debug` to also see the pipeline's own diagnostics.

use std::time::Duration;

use http_observer::{ConsoleSink, FnSink, HttpClient, HttpClientOptions};
use serde_json::{json, Value};

const API: &str = "https://jsonplaceholder.typicode.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    println!("HTTP Observer Demo");
    println!("==================\n");

    // Step 1: plain client, nothing is logged
    println!("1. Without logging");
    let client = HttpClient::new(HttpClientOptions::default())?;
    let post: Value = client.get(&format!("{}/posts/1", API), None).await?;
    println!("Received: {}\n", post["title"]);

    // Step 2: logging switched on without a sink uses the console
    println!("2. Default console sink");
    let client = HttpClient::builder().enable_logging(true).build()?;
    let created: Value = client
        .post(
            &format!("{}/posts", API),
            Some(json!({"title": "Test", "body": "Test content", "userId": 1})),
            None,
        )
        .await?;
    println!("Created post: {}\n", created["id"]);

    // Step 3: custom sink; info is missing so successes fall back from trace
    println!("3. Custom sink");
    let sink = FnSink::new()
        .trace(|record, tag| {
            println!(
                "[TRACE] {} {}",
                tag,
                serde_json::to_string_pretty(record).unwrap_or_default()
            );
        })
        .error(|record, tag| {
            eprintln!(
                "[ERROR] {} {}",
                tag,
                serde_json::to_string_pretty(record).unwrap_or_default()
            );
        });
    let client = HttpClient::builder()
        .logger(sink)
        .context("MyApiClient")
        .build()?;
    let post: Value = client.get(&format!("{}/posts/1", API), None).await?;
    println!("Data: {}\n", post["id"]);

    // Step 4: base URL and relative paths
    println!("4. Base URL");
    let client = HttpClient::builder()
        .base_url(API)
        .timeout(Duration::from_secs(5))
        .header("Content-Type", "application/json")
        .logger(ConsoleSink::new("JsonPlaceholder"))
        .build()?;
    let posts: Vec<Value> = client.get("/posts", None).await?;
    println!("Fetched {} posts", posts.len());

    Ok(())
}
