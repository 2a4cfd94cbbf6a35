//! Prerequisite tool checks.

use which::which;

use crate::error::Error;
use crate::ui;

/// CLI tools the workflows shell out to, in check order.
pub const REQUIRED_TOOLS: [&str; 4] = ["kubectl", "helm", "git", "serverless"];

/// Verify that every tool resolves on PATH.
///
/// Runs before any mutating step and fails on the first tool that is
/// missing.
///
/// # Errors
///
/// Returns [`Error::MissingPrerequisite`] naming the first missing tool.
pub fn check(tools: &[&str]) -> Result<(), Error> {
    for tool in tools {
        if which(tool).is_ok() {
            ui::print_check_result(tool, true);
        } else {
            ui::print_check_result(tool, false);
            return Err(Error::MissingPrerequisite {
                tool: (*tool).to_string(),
            });
        }
    }
    Ok(())
}
