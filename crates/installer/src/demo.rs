//! Demo application deployment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::InstallConfig;
use crate::process::Cmd;
use crate::ui;

/// Clone the demo repository unless its checkout directory already exists.
///
/// Returns the checkout directory either way, so re-running `deploy` after a
/// partial failure never re-clones.
pub async fn ensure_demo_repo(config: &InstallConfig) -> Result<PathBuf> {
    let repo_dir = config.demo_repo_dir();
    if repo_dir.exists() {
        info!(path = %repo_dir.display(), "Demo repository already cloned");
        return Ok(repo_dir);
    }

    ui::print_progress("Cloning demo application repository...");
    Cmd::new("git")
        .arg("clone")
        .arg(config.demo_repo_url.as_str())
        .current_dir(&config.work_dir)
        .run()
        .await
        .context("Failed to clone demo repository")?;

    Ok(repo_dir)
}

/// Install dependencies and deploy the demo stack against LocalStack.
///
/// `EDGE_PORT` points the serverless framework at the cluster load balancer.
pub async fn deploy_app(config: &InstallConfig, repo_dir: &Path) -> Result<()> {
    ui::print_progress("Installing demo application dependencies...");
    Cmd::new("npm")
        .arg("install")
        .current_dir(repo_dir)
        .run()
        .await
        .context("Failed to install demo application dependencies")?;

    ui::print_progress("Deploying demo application...");
    Cmd::new("serverless")
        .arg("deploy")
        .current_dir(repo_dir)
        .env("EDGE_PORT", config.lb_port.to_string())
        .run()
        .await
        .context("Failed to deploy demo application")?;

    Ok(())
}
