//! kubectl install step.
//!
//! Downloads the stable release binary, verifies its published SHA-256
//! locally, and installs it to /usr/local/bin. When kubectl is already on
//! the host the operator decides whether to update; when it is absent the
//! install proceeds without asking.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use sha2::{Digest, Sha256};

use super::Context;
use crate::probe::Tool;
use crate::{console, process};

const STABLE_VERSION: &str = "curl -fsSL https://dl.k8s.io/release/stable.txt";
const INSTALL: &str = "sudo install -o root -g root -m 0755 kubectl /usr/local/bin/kubectl";
const SHOW_VERSION: &str = "kubectl version --output=yaml";

pub fn install(ctx: &Context) -> Result<()> {
    console::section("Kubectl");

    let stable = process::run_captured(STABLE_VERSION)?;
    console::note(&format!("Kubectl stable version is {}", stable));

    let update = match ctx.tool_path(Tool::Kubectl) {
        Some(_) => ctx
            .prompter
            .confirm("Update kubectl to the latest version?")?,
        None => true,
    };

    if !update {
        return Ok(());
    }

    console::step("Download kubectl binary");
    process::run(&format!(
        r#"curl -fsSLO "https://dl.k8s.io/release/{}/bin/linux/amd64/kubectl""#,
        stable
    ))?;

    // The published checksum lives one path segment up from the binary.
    console::step("Validate the binary");
    process::run(&format!(
        r#"curl -fsSLO "https://dl.k8s.io/{}/bin/linux/amd64/kubectl.sha256""#,
        stable
    ))?;
    verify_checksum(Path::new("kubectl"), Path::new("kubectl.sha256"))?;
    console::note("   kubectl: OK");

    console::step("Install kubectl");
    process::run(INSTALL)?;
    process::run(SHOW_VERSION)?;

    Ok(())
}

/// Compare a downloaded file against a hex SHA-256 digest file.
///
/// The digest file may carry just the hex string or the
/// `<hex>  <filename>` form; only the first field is read.
pub fn verify_checksum(binary: &Path, checksum_file: &Path) -> Result<()> {
    let published = fs::read_to_string(checksum_file)
        .with_context(|| format!("reading checksum file {}", checksum_file.display()))?;
    let expected = published
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();

    let bytes = fs::read(binary)
        .with_context(|| format!("reading downloaded binary {}", binary.display()))?;
    let actual = {
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        format!("{:x}", hasher.finalize())
    };

    if expected.is_empty() || actual != expected {
        bail!(
            "checksum mismatch for {}:\n  expected: {}\n  actual:   {}",
            binary.display(),
            expected,
            actual
        );
    }

    Ok(())
}
