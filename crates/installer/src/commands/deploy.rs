//! The `deploy` workflow: fetch and deploy the demo application.

use anyhow::Result;

use crate::config::InstallConfig;
use crate::{demo, ui};

/// Deploy the demo serverless application against a running LocalStack.
pub async fn run(config: &InstallConfig) -> Result<()> {
    ui::print_section("Deploying the LocalStack demo application");

    ui::print_step(1, 2, "Fetching demo application");
    let repo_dir = demo::ensure_demo_repo(config).await?;

    ui::print_step(2, 2, "Deploying demo application");
    demo::deploy_app(config, &repo_dir).await?;

    ui::print_success("Demo application deployed");
    Ok(())
}
