//! Installer configuration.
//!
//! Everything the components need - cluster identity, ports, retry budgets,
//! filesystem locations, chart coordinates - lives in one explicit structure
//! so tests can substitute doctored values (shrunk budgets, temp dirs)
//! without touching global state.

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Full installer configuration.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    // Cluster identity
    /// Name of the k3d cluster to provision.
    pub cluster_name: String,
    /// Host port routed onto the cluster load balancer (container port 80).
    pub lb_port: u16,
    /// Internal Kubernetes API port.
    pub api_port: u16,

    // k3d binary
    /// Pinned k3d release version.
    pub k3d_version: String,

    // Paths
    /// Directory holding the cached k3d binary and the demo app checkout.
    pub work_dir: PathBuf,
    /// Target file for merged cluster credentials.
    pub kubeconfig: PathBuf,

    // Helm chart
    /// Name under which the chart repository is registered.
    pub chart_repo_name: String,
    /// Chart repository URL.
    pub chart_repo_url: String,
    /// Release name for the installed chart.
    pub release_name: String,
    /// Chart reference (`repo/chart`).
    pub chart: String,

    // Demo application
    /// Git URL of the demo serverless application.
    pub demo_repo_url: String,

    // Retry budgets
    /// Budget for the load balancer connectivity wait.
    pub lb_retry: RetryPolicy,
    /// Budget for the health endpoint wait.
    pub health_retry: RetryPolicy,

    // Optional environment inputs
    /// LocalStack API key, if provided.
    pub api_key: Option<String>,
    /// Lambda runtime image mapping override, if provided.
    pub runtime_image_mapping: Option<String>,
}

impl InstallConfig {
    /// Create a configuration with the stock deployment values.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            cluster_name: "ls-cluster".into(),
            lb_port: 8081,
            api_port: 6443,
            k3d_version: "v5.4.6".into(),
            work_dir: std::env::temp_dir(),
            kubeconfig: dirs::home_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(".kube")
                .join("config"),
            chart_repo_name: "localstack".into(),
            chart_repo_url: "https://localstack.github.io/helm-charts".into(),
            release_name: "localstack".into(),
            chart: "localstack/localstack".into(),
            demo_repo_url: "git@github.com:localstack/localstack-demo.git".into(),
            lb_retry: RetryPolicy::new(180, Duration::from_secs(2)),
            health_retry: RetryPolicy::new(60, Duration::from_secs(2)),
            api_key: None,
            runtime_image_mapping: None,
        }
    }

    /// Build the runtime configuration from the process environment.
    ///
    /// `K3D_LB_PORT` overrides the load balancer port; `LOCALSTACK_API_KEY`
    /// and `LAMBDA_RUNTIME_IMAGE_MAPPING` feed the chart override variables.
    /// Empty values count as absent.
    #[must_use]
    pub fn from_env() -> Self {
        let lb_port = std::env::var("K3D_LB_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8081);

        Self {
            lb_port,
            api_key: env_nonempty("LOCALSTACK_API_KEY"),
            runtime_image_mapping: env_nonempty("LAMBDA_RUNTIME_IMAGE_MAPPING"),
            ..Self::with_defaults()
        }
    }

    /// Base URL of the cluster load balancer on the host.
    #[must_use]
    pub fn lb_url(&self) -> String {
        format!("http://localhost:{}", self.lb_port)
    }

    /// LocalStack health endpoint behind the ingress.
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}/health", self.lb_url())
    }

    /// Checkout directory for the demo application.
    #[must_use]
    pub fn demo_repo_dir(&self) -> PathBuf {
        self.work_dir.join("localstack-demo")
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
