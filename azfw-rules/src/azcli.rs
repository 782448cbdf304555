//! Synchronous Azure CLI invocation.

use std::process::Command;

use anyhow::{bail, Context, Result};

/// Run `az` with the given arguments and return its stdout. Failures carry
/// the CLI's stderr so provisioning errors surface verbatim.
pub fn run(args: &[&str]) -> Result<String> {
    let output = Command::new("az")
        .args(args)
        .output()
        .context("failed to launch the Azure CLI (az); is it installed and on PATH?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "az {} failed: {}",
            args.first().copied().unwrap_or_default(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
