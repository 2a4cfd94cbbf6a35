//! LocalStack readiness gate.

use anyhow::{Context, Result};

use crate::retry::{retry, RetryPolicy};
use crate::ui;

/// Poll `health_url` until it answers with a success status.
///
/// Any non-2xx status or transport failure counts as a failed attempt.
pub async fn wait_until_ready(health_url: &str, policy: RetryPolicy) -> Result<()> {
    ui::print_progress(&format!("Waiting for {health_url} to report healthy..."));

    let client = reqwest::Client::new();
    retry(
        &format!("healthy response from {health_url}"),
        policy,
        || {
            let client = client.clone();
            let url = health_url.to_string();
            async move {
                let response = client
                    .get(url.as_str())
                    .send()
                    .await
                    .context("health endpoint unreachable")?;
                anyhow::ensure!(
                    response.status().is_success(),
                    "health endpoint returned {}",
                    response.status()
                );
                Ok(())
            }
        },
    )
    .await?;

    Ok(())
}
