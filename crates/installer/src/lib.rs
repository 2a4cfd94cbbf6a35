//! LocalStack on k3d installer library.
//!
//! This library backs the `l8k` CLI: it provisions a local k3d Kubernetes
//! cluster inside Docker, installs the LocalStack Helm chart, configures
//! ingress and RBAC, and waits until the stack is ready. All heavy lifting is
//! delegated to external tools (`k3d`, `helm`, `kubectl`, `git`, `npm`,
//! `serverless`) invoked as subprocesses; the code here is sequencing,
//! environment plumbing, and retry loops.
//!
//! # Example
//!
//! ```ignore
//! use l8k::{commands, InstallConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = InstallConfig::from_env();
//!     commands::install::run(&config).await
//! }
//! ```

// Allow product names without backticks in doc comments
#![allow(clippy::doc_markdown)]

pub mod cluster;
pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod helm;
pub mod k3d;
pub mod manifests;
pub mod prereqs;
pub mod process;
pub mod readiness;
pub mod retry;
pub mod ui;

// Re-export commonly used types at the crate root
pub use config::InstallConfig;
pub use error::Error;
pub use retry::RetryPolicy;
