//! k3d binary provisioning.
//!
//! Downloads the pinned k3d release for the host platform into a cache file
//! under the work directory and reuses it on subsequent calls. Several
//! cluster operations provision independently, so this must stay idempotent.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::InstallConfig;
use crate::error::Error;

/// Host platform a k3d release binary is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    os: &'static str,
    arch: &'static str,
}

impl Platform {
    /// Detect the host platform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] on anything other than Linux or
    /// macOS.
    pub fn detect() -> Result<Self, Error> {
        Self::from_os_arch(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn from_os_arch(os: &'static str, arch: &'static str) -> Result<Self, Error> {
        let os = match os {
            "linux" => "linux",
            "macos" => "darwin",
            other => {
                return Err(Error::UnsupportedPlatform {
                    os: other.to_string(),
                })
            }
        };
        // Release assets use Go naming for the architecture.
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            other => other,
        };
        Ok(Self { os, arch })
    }

    /// `<os>-<arch>` token substituted into the release URL.
    fn token(self) -> String {
        format!("{}-{}", self.os, self.arch)
    }

    /// Cache file name for this platform.
    fn cache_file_name(self) -> String {
        format!("k3d.{}.bin", self.os)
    }
}

/// Release URL for the pinned k3d version on the given platform.
fn release_url(version: &str, platform: Platform) -> String {
    format!(
        "https://github.com/rancher/k3d/releases/download/{version}/k3d-{}",
        platform.token()
    )
}

/// Ensure the k3d binary is cached locally and return its path.
///
/// The download is skipped when the cache file already exists; a stale cache
/// persists until deleted manually.
///
/// # Errors
///
/// Returns an error when the platform is unsupported or the download fails.
pub async fn ensure_k3d_binary(config: &InstallConfig) -> Result<PathBuf> {
    let platform = Platform::detect()?;
    let bin_file = config.work_dir.join(platform.cache_file_name());
    if bin_file.exists() {
        debug!(path = %bin_file.display(), "Using cached k3d binary");
        return Ok(bin_file);
    }

    let url = release_url(&config.k3d_version, platform);
    download(&url, &bin_file).await?;
    make_executable(&bin_file)?;

    Ok(bin_file)
}

async fn download(url: &str, target: &Path) -> Result<()> {
    info!(url, "Downloading k3d binary");

    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to download {url}"))?
        .error_for_status()
        .with_context(|| format!("Download of {url} failed"))?;

    let body = response
        .bytes()
        .await
        .context("Failed to read download body")?;
    std::fs::write(target, &body)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o777))
        .with_context(|| format!("Failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
