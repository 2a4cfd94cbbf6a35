//! Error taxonomy for the installer.
//!
//! Workflow code propagates these with `anyhow`, adding context at each step;
//! the variants here are the failures callers may want to match on.

use thiserror::Error;

/// Failures raised by installer components.
#[derive(Debug, Error)]
pub enum Error {
    /// The host has no published k3d binary we can install.
    #[error("unsupported operating system `{os}` (only Linux and macOS are supported)")]
    UnsupportedPlatform {
        /// Host OS name as reported by the standard library.
        os: String,
    },

    /// A subprocess exited with a non-zero status.
    #[error("`{command}` exited with status {status}: {stderr}")]
    CommandFailed {
        /// Rendered command line.
        command: String,
        /// Exit status code (-1 when terminated by a signal).
        status: i32,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// A retried operation ran out of attempts.
    #[error("gave up waiting for {waited_for} after {attempts} attempts")]
    RetryExhausted {
        /// Human-readable description of what was being awaited.
        waited_for: String,
        /// Number of attempts made.
        attempts: u32,
        /// The last underlying failure.
        #[source]
        source: anyhow::Error,
    },

    /// A required CLI tool is not resolvable on PATH.
    #[error("required command-line tool `{tool}` is not installed")]
    MissingPrerequisite {
        /// Name of the missing tool.
        tool: String,
    },

    /// The k3d load balancer never became reachable.
    #[error("k3d cluster did not become available")]
    ClusterUnavailable(#[source] Box<Error>),
}
