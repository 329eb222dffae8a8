//! Utility module for common functionality

use std::time::{Duration, Instant};

/// Await a future and measure how long it took
pub async fn measure_time_async<Fut, T>(future: Fut) -> (T, Duration)
where
    Fut: std::future::Future<Output = T>,
{
    let start = Instant::now();
    let result = future.await;
    let duration = start.elapsed();
    (result, duration)
}

/// Generate a unique call ID
pub fn generate_call_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
