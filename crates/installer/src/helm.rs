//! LocalStack Helm release installation.

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::InstallConfig;
use crate::process::Cmd;
use crate::ui;

/// Outcome of `helm repo add`.
///
/// Helm reports an existing registration only through human-readable text, so
/// the substring match lives in [`classify_repo_add`] and nowhere else.
#[derive(Debug, PartialEq, Eq)]
enum RepoAddOutcome {
    Added,
    AlreadyExists,
}

fn classify_repo_add(result: Result<String>) -> Result<RepoAddOutcome> {
    match result {
        Ok(_) => Ok(RepoAddOutcome::Added),
        Err(e) if format!("{e:#}").contains("already exists") => Ok(RepoAddOutcome::AlreadyExists),
        Err(e) => Err(e),
    }
}

pub struct ReleaseInstaller<'a> {
    config: &'a InstallConfig,
}

impl<'a> ReleaseInstaller<'a> {
    pub const fn new(config: &'a InstallConfig) -> Self {
        Self { config }
    }

    /// Register the chart repository, tolerating a previous registration.
    pub async fn add_repo(&self) -> Result<()> {
        let result = Cmd::new("helm")
            .args(["repo", "add"])
            .arg(self.config.chart_repo_name.as_str())
            .arg(self.config.chart_repo_url.as_str())
            .run()
            .await;

        match classify_repo_add(result)? {
            RepoAddOutcome::Added => ui::print_info(&format!(
                "Registered Helm repository '{}'",
                self.config.chart_repo_name
            )),
            RepoAddOutcome::AlreadyExists => debug!(
                repo = %self.config.chart_repo_name,
                "Helm repository already registered"
            ),
        }

        Ok(())
    }

    /// Install the release with the computed override variables.
    pub async fn install(&self) -> Result<()> {
        ui::print_progress(&format!(
            "Installing Helm release '{}'...",
            self.config.release_name
        ));

        let overrides = override_vars(self.config);
        let mut cmd = Cmd::new("helm")
            .arg("install")
            .arg(self.config.release_name.as_str())
            .arg(self.config.chart.as_str())
            .args(["--set", "debug=true"]);
        for flag in override_flags(&overrides) {
            cmd = cmd.arg(flag);
        }

        cmd.run().await.context("Failed to install Helm release")?;
        Ok(())
    }
}

/// Build the override variable set from the optional environment inputs.
///
/// Order matters: each entry's position names the `extraEnvVars[i]` flag pair
/// that carries it, and the API-key-derived entries precede the runtime image
/// mapping.
pub fn override_vars(config: &InstallConfig) -> Vec<(String, String)> {
    let mut vars = Vec::new();

    if let Some(key) = &config.api_key {
        vars.push(("LOCALSTACK_API_KEY".to_string(), key.clone()));
        vars.push((
            "LAMBDA_RUNTIME_EXECUTOR".to_string(),
            "kubernetes".to_string(),
        ));
        vars.push((
            "LOCALSTACK_K8S_SERVICE_NAME".to_string(),
            "default".to_string(),
        ));
        vars.push((
            "LOCALSTACK_K8S_NAMESPACE".to_string(),
            "default".to_string(),
        ));
    }

    if let Some(mapping) = &config.runtime_image_mapping {
        vars.push(("LAMBDA_RUNTIME_IMAGE_MAPPING".to_string(), mapping.clone()));
    }

    vars
}

/// Render the indexed `--set` / `--set-string` flag pairs for the overrides.
/// Values go through `--set-string` so helm never coerces them.
fn override_flags(vars: &[(String, String)]) -> Vec<String> {
    let mut flags = Vec::new();
    for (i, (key, value)) in vars.iter().enumerate() {
        flags.push("--set".to_string());
        flags.push(format!("extraEnvVars[{i}].name={key}"));
        flags.push("--set-string".to_string());
        flags.push(format!("extraEnvVars[{i}].value={value}"));
    }
    flags
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::*;

    fn config_with(api_key: Option<&str>, mapping: Option<&str>) -> InstallConfig {
        let mut config = InstallConfig::with_defaults();
        config.api_key = api_key.map(String::from);
        config.runtime_image_mapping = mapping.map(String::from);
        config
    }

    #[test]
    fn test_no_inputs_produce_no_overrides() {
        assert!(override_vars(&config_with(None, None)).is_empty());
    }

    #[test]
    fn test_api_key_produces_four_overrides_in_order() {
        let vars = override_vars(&config_with(Some("secret"), None));
        let keys: Vec<&str> = vars.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "LOCALSTACK_API_KEY",
                "LAMBDA_RUNTIME_EXECUTOR",
                "LOCALSTACK_K8S_SERVICE_NAME",
                "LOCALSTACK_K8S_NAMESPACE",
            ]
        );
        assert_eq!(vars[0].1, "secret");
        assert_eq!(vars[1].1, "kubernetes");
    }

    #[test]
    fn test_both_inputs_produce_five_overrides_mapping_last() {
        let vars = override_vars(&config_with(Some("secret"), Some("img=repo:tag")));
        assert_eq!(vars.len(), 5);
        assert_eq!(
            vars[4],
            (
                "LAMBDA_RUNTIME_IMAGE_MAPPING".to_string(),
                "img=repo:tag".to_string()
            )
        );
    }

    #[test]
    fn test_mapping_alone_produces_one_override() {
        let vars = override_vars(&config_with(None, Some("img=repo:tag")));
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].0, "LAMBDA_RUNTIME_IMAGE_MAPPING");
    }

    #[test]
    fn test_override_flags_pair_name_and_value_by_index() {
        let vars = vec![
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "2".to_string()),
        ];
        assert_eq!(
            override_flags(&vars),
            [
                "--set",
                "extraEnvVars[0].name=A",
                "--set-string",
                "extraEnvVars[0].value=1",
                "--set",
                "extraEnvVars[1].name=B",
                "--set-string",
                "extraEnvVars[1].value=2",
            ]
        );
    }

    #[test]
    fn test_classify_tolerates_already_exists() {
        let err: anyhow::Error = Error::CommandFailed {
            command: "helm repo add localstack ...".into(),
            status: 1,
            stdout: String::new(),
            stderr: "Error: repository name (localstack) already exists, please specify a \
                     different name"
                .into(),
        }
        .into();

        assert_eq!(
            classify_repo_add(Err(err)).unwrap(),
            RepoAddOutcome::AlreadyExists
        );
    }

    #[test]
    fn test_classify_propagates_other_failures() {
        let err: anyhow::Error = Error::CommandFailed {
            command: "helm repo add localstack ...".into(),
            status: 1,
            stdout: String::new(),
            stderr: "Error: no such host".into(),
        }
        .into();

        assert!(classify_repo_add(Err(err)).is_err());
    }

    #[test]
    fn test_classify_success() {
        assert_eq!(
            classify_repo_add(Ok(String::new())).unwrap(),
            RepoAddOutcome::Added
        );
    }
}
