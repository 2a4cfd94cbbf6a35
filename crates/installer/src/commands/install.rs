//! The `install` workflow: cluster, chart, ingress, RBAC, readiness.

use anyhow::Result;

use crate::cluster::ClusterProvisioner;
use crate::config::InstallConfig;
use crate::helm::ReleaseInstaller;
use crate::{manifests, prereqs, readiness, ui};

/// Run the full installation workflow.
///
/// Every step is idempotent, so a failed run can simply be restarted; there
/// is no rollback of completed steps.
pub async fn run(config: &InstallConfig) -> Result<()> {
    ui::print_section("Installing LocalStack on k3d");

    ui::print_step(1, 6, "Checking prerequisites");
    prereqs::check(&prereqs::REQUIRED_TOOLS)?;

    ui::print_step(2, 6, "Creating local k3d cluster");
    let cluster = ClusterProvisioner::new(config);
    cluster.create().await?;
    cluster.wait_for_load_balancer().await?;
    cluster.merge_kubeconfig().await?;

    ui::print_step(3, 6, "Installing LocalStack Helm chart");
    let installer = ReleaseInstaller::new(config);
    installer.add_repo().await?;
    installer.install().await?;

    ui::print_step(4, 6, "Configuring ingress");
    manifests::apply(manifests::INGRESS).await?;

    ui::print_step(5, 6, "Configuring service account permissions");
    manifests::apply(manifests::RBAC).await?;

    ui::print_step(6, 6, "Waiting for LocalStack to be ready");
    readiness::wait_until_ready(&config.health_url(), config.health_retry).await?;

    ui::print_success("LocalStack is ready");
    Ok(())
}
