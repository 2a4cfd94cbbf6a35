//! Embedded Kubernetes manifests and the kubectl applier.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::process::Cmd;

/// Ingress rule routing all load balancer traffic to the LocalStack edge
/// service.
pub const INGRESS: &str = r#"apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: localstack
  annotations:
    ingress.kubernetes.io/ssl-redirect: "false"
spec:
  rules:
  - http:
      paths:
      - path: /
        pathType: Prefix
        backend:
          service:
            name: localstack
            port:
              number: 4566
"#;

/// Grants the LocalStack service account cluster-admin so the Kubernetes
/// Lambda executor can manage runtime pods.
pub const RBAC: &str = r#"kind: ClusterRoleBinding
apiVersion: rbac.authorization.k8s.io/v1
metadata:
  name: localstack
subjects:
- kind: ServiceAccount
  name: localstack
  namespace: default
roleRef:
  kind: ClusterRole
  name: cluster-admin
  apiGroup: ""
"#;

/// Apply a manifest document with kubectl.
pub async fn apply(manifest: &str) -> Result<()> {
    apply_via("kubectl", &std::env::temp_dir(), manifest).await
}

/// Apply `manifest` by writing it to a temporary file under `dir` and handing
/// the path to `program`. The file is removed when this function returns,
/// whether or not the apply succeeded.
async fn apply_via(program: &str, dir: &Path, manifest: &str) -> Result<()> {
    let mut file =
        NamedTempFile::new_in(dir).context("Failed to create temporary manifest file")?;
    file.write_all(manifest.as_bytes())
        .context("Failed to write manifest")?;
    // kubectl reads the file from a separate process; it must observe
    // complete content.
    file.flush().context("Failed to flush manifest")?;

    debug!(path = %file.path().display(), "Applying manifest");
    Cmd::new(program)
        .args(["apply", "-f"])
        .arg(file.path().to_string_lossy())
        .run()
        .await
        .context("Failed to apply manifest")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_temp_file_removed_on_success() {
        let dir = tempfile::tempdir().unwrap();
        apply_via("true", dir.path(), INGRESS).await.unwrap();
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_temp_file_removed_when_apply_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = apply_via("false", dir.path(), INGRESS).await;
        assert!(result.is_err());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_ingress_routes_to_edge_port() {
        assert!(INGRESS.contains("number: 4566"));
        assert!(INGRESS.contains("pathType: Prefix"));
    }

    #[test]
    fn test_rbac_binds_cluster_admin() {
        assert!(RBAC.contains("kind: ClusterRoleBinding"));
        assert!(RBAC.contains("name: cluster-admin"));
    }
}
