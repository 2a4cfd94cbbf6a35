//! k3d cluster lifecycle.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::config::InstallConfig;
use crate::error::Error;
use crate::k3d;
use crate::process::Cmd;
use crate::retry::retry;
use crate::ui;

/// One record from `k3d cluster list -o json`. Only the name matters here;
/// everything else about an existing cluster is left alone.
#[derive(Debug, Deserialize)]
struct ClusterRecord {
    name: String,
}

pub struct ClusterProvisioner<'a> {
    config: &'a InstallConfig,
}

impl<'a> ClusterProvisioner<'a> {
    pub const fn new(config: &'a InstallConfig) -> Self {
        Self { config }
    }

    /// Create the cluster unless one with the configured name already exists.
    ///
    /// `k3d cluster create` fails on a duplicate name, so existence is
    /// checked first to keep the whole step re-runnable.
    pub async fn create(&self) -> Result<()> {
        let bin_file = k3d::ensure_k3d_binary(self.config).await?;

        let listing = Cmd::new(bin_file.to_string_lossy())
            .args(["cluster", "list", "-o", "json"])
            .run()
            .await
            .context("Failed to list k3d clusters")?;

        if cluster_listed(&listing, &self.config.cluster_name)? {
            ui::print_info(&format!(
                "k3d cluster '{}' already exists",
                self.config.cluster_name
            ));
            return Ok(());
        }

        ui::print_progress(&format!(
            "Creating k3d cluster '{}'...",
            self.config.cluster_name
        ));
        Cmd::new(bin_file.to_string_lossy())
            .args(["cluster", "create"])
            .arg(self.config.cluster_name.as_str())
            .arg("--api-port")
            .arg(self.config.api_port.to_string())
            .arg("-p")
            .arg(format!("{}:80@loadbalancer", self.config.lb_port))
            .run()
            .await
            .context("Failed to create k3d cluster")?;

        Ok(())
    }

    /// Poll the load balancer until it accepts connections.
    ///
    /// Any HTTP response counts as reachable; the local endpoint does not
    /// present a trusted certificate, so verification is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClusterUnavailable`] wrapping the retry failure when
    /// the attempt budget runs out.
    pub async fn wait_for_load_balancer(&self) -> Result<()> {
        let lb_url = self.config.lb_url();
        ui::print_progress(&format!("Waiting for the load balancer at {lb_url}..."));

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to build HTTP client")?;

        retry(
            &format!("load balancer at {lb_url}"),
            self.config.lb_retry,
            || {
                let client = client.clone();
                let url = lb_url.clone();
                async move {
                    client.get(url.as_str()).send().await?;
                    Ok(())
                }
            },
        )
        .await
        .map_err(|e| Error::ClusterUnavailable(Box::new(e)))?;

        debug!(url = %lb_url, "Load balancer is reachable");
        Ok(())
    }

    /// Merge the cluster credentials into the user-level kube config.
    pub async fn merge_kubeconfig(&self) -> Result<()> {
        let bin_file = k3d::ensure_k3d_binary(self.config).await?;

        if let Some(parent) = self.config.kubeconfig.parent() {
            std::fs::create_dir_all(parent).context("Failed to create kube config directory")?;
        }

        Cmd::new(bin_file.to_string_lossy())
            .args(["kubeconfig", "merge", "-o"])
            .arg(self.config.kubeconfig.to_string_lossy())
            .arg(self.config.cluster_name.as_str())
            .run()
            .await
            .context("Failed to merge cluster credentials into kube config")?;

        Ok(())
    }
}

/// Check whether a `cluster list -o json` payload names the target cluster.
fn cluster_listed(json: &str, name: &str) -> Result<bool> {
    let clusters: Vec<ClusterRecord> =
        serde_json::from_str(json).context("Unexpected `k3d cluster list` output")?;
    Ok(clusters.iter().any(|c| c.name == name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_listed_matches_by_name() {
        let json = r#"[{"name": "ls-cluster", "serversCount": 1}]"#;
        assert!(cluster_listed(json, "ls-cluster").unwrap());
    }

    #[test]
    fn test_cluster_listed_ignores_other_clusters() {
        let json = r#"[{"name": "dev"}, {"name": "staging"}]"#;
        assert!(!cluster_listed(json, "ls-cluster").unwrap());
    }

    #[test]
    fn test_cluster_listed_finds_target_among_others() {
        let json = r#"[{"name": "dev"}, {"name": "ls-cluster"}, {"name": "staging"}]"#;
        assert!(cluster_listed(json, "ls-cluster").unwrap());
    }

    #[test]
    fn test_cluster_listed_empty_list() {
        assert!(!cluster_listed("[]", "ls-cluster").unwrap());
    }

    #[test]
    fn test_cluster_listed_rejects_malformed_output() {
        assert!(cluster_listed("not json", "ls-cluster").is_err());
    }
}
