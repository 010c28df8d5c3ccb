//! Preflight checks for host validation.
//!
//! Validates that the host has the commands a run will shell out to before
//! anything mutating happens. This prevents cryptic mid-run errors after
//! packages have already been removed.
//!
//! # Example
//!
//! ```rust
//! use node_bootstrap::preflight::{command_exists, check_required_tools};
//!
//! // Check a single command
//! if !command_exists("yum") {
//!     println!("not a yum-based host");
//! }
//!
//! // Check multiple tools
//! let tools = &[("yum", "yum"), ("rpm", "rpm")];
//! if let Err(e) = check_required_tools(tools) {
//!     eprintln!("{}", e);
//! }
//! ```

use anyhow::{bail, Result};

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Host tools the bootstrap flow shells out to.
///
/// Each tuple is (command_name, package_name).
pub const BOOTSTRAP_TOOLS: &[(&str, &str)] = &[
    ("sh", "bash"),
    ("curl", "curl"),
    ("yum", "yum"),
    ("systemctl", "systemd"),
    ("hostnamectl", "systemd"),
];

/// Host tools the kernel-upgrade flow shells out to.
pub const KERNEL_TOOLS: &[(&str, &str)] = &[
    ("sh", "bash"),
    ("uname", "coreutils"),
    ("yum", "yum"),
    ("rpm", "rpm"),
    ("sed", "sed"),
    ("grub2-mkconfig", "grub2-tools"),
];

/// Check that specific tools are available.
///
/// # Arguments
///
/// * `tools` - Slice of (command, package) tuples
///
/// # Returns
///
/// * `Ok(())` if all tools are found
/// * `Err` with list of missing tools and their packages
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let mut missing = Vec::new();

    for (tool, package) in tools {
        if !command_exists(tool) {
            missing.push((*tool, *package));
        }
    }

    if !missing.is_empty() {
        let msg = missing
            .iter()
            .map(|(t, p)| format!("  {} (install: {})", t, p))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Missing required host tools:\n{}", msg);
    }

    Ok(())
}
