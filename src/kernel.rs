//! CentOS 7.x kernel upgrade sequence.
//!
//! Linear flow against the ELRepo kernel repository: update yum, import
//! the ELRepo signing key, enable the repository (install, or update an
//! existing release package when the fresh install path fails), install
//! the chosen kernel flavor, point GRUB at the new entry, swap the kernel
//! tools to the matching flavor, and reboot after a short countdown.
//!
//! The host is expected to be CentOS 7.x; the ELRepo release package and
//! repo names are pinned to el7.

use std::thread;
use std::time::Duration;

use anyhow::Result;

use crate::options::RunOptions;
use crate::prompt::Prompter;
use crate::{console, preflight, process};

const ELREPO_KEY: &str = "rpm --import https://www.elrepo.org/RPM-GPG-KEY-elrepo.org";
const ELREPO_LIST: &str = r#"yum --disablerepo="*" --enablerepo="elrepo-kernel" list available"#;
const ELREPO_INSTALL: &str =
    "yum install -y https://www.elrepo.org/elrepo-release-7.el7.elrepo.noarch.rpm";
const ELREPO_UPDATE: &str =
    "rpm -Uvh https://www.elrepo.org/elrepo-release-7.el7.elrepo.noarch.rpm";
const ELREPO_REPOLIST: &str = r"yum --disablerepo=\* --enablerepo=elrepo-kernel repolist";
const GRUB_DEFAULT: &str = r#"sed -i "s/GRUB_DEFAULT=saved/GRUB_DEFAULT=0/g" /etc/default/grub"#;
const GRUB_MKCONFIG: &str = "grub2-mkconfig -o /boot/grub2/grub.cfg";
const REMOVE_TOOLS: &str = "yum remove -y kernel-tools-libs.x86_64 kernel-tools.x86_64";

/// Kernel lines offered by the ELRepo kernel repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelFlavor {
    /// `kernel-lt`, the long-term support line.
    LongTerm,
    /// `kernel-ml`, the mainline line.
    Mainline,
}

impl KernelFlavor {
    pub fn package(self) -> &'static str {
        match self {
            KernelFlavor::LongTerm => "kernel-lt",
            KernelFlavor::Mainline => "kernel-ml",
        }
    }

    /// Tools package matching this kernel line.
    pub fn tools_package(self) -> &'static str {
        match self {
            KernelFlavor::LongTerm => "kernel-lt-tools.x86_64",
            KernelFlavor::Mainline => "kernel-ml-tools.x86_64",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KernelFlavor::LongTerm => "LTS",
            KernelFlavor::Mainline => "Stable",
        }
    }
}

/// Map the operator's menu answer onto a flavor. `1` selects the
/// long-term line; anything else selects mainline.
pub fn kernel_flavor(choice: &str) -> KernelFlavor {
    if choice.trim() == "1" {
        KernelFlavor::LongTerm
    } else {
        KernelFlavor::Mainline
    }
}

/// Run the full kernel upgrade sequence. Ends in a reboot unless the
/// operator declines up front.
pub fn run(options: RunOptions) -> Result<()> {
    preflight::check_required_tools(preflight::KERNEL_TOOLS)?;
    let prompter = Prompter::new(options.assume_yes);

    let current = process::run_captured("uname -r")?;
    console::note(&format!("\nCurrent kernel version: {}", current));

    if !prompter.confirm("Are you sure to update the kernel?")? {
        console::note("Goodbye!");
        return Ok(());
    }

    console::note("Update yum source repo");
    process::run("yum -y update")?;

    console::note("Load the public key of the ELRepo");
    process::run(ELREPO_KEY)?;

    enable_elrepo()?;

    console::note("Load elrepo-kernel metadata");
    process::run(ELREPO_REPOLIST)?;

    let choice = prompter.ask_with_default(
        "\nChoose a kernel type to install, 1) LTS or 2) Stable:",
        "1",
    )?;
    let flavor = kernel_flavor(&choice);

    console::note(&format!("Install kernel {}", flavor.label()));
    process::run(&format!(
        r"yum --disablerepo=\* --enablerepo=elrepo-kernel install {} -y",
        flavor.package()
    ))?;

    console::note("Set the new kernel as the default grub entry");
    process::run(GRUB_DEFAULT)?;

    console::note("Generate grub file");
    process::run(GRUB_MKCONFIG)?;

    console::note("Remove old kernel tools");
    process::run(REMOVE_TOOLS)?;

    console::note("Install newest kernel tools");
    process::run(&format!(
        r"yum --disablerepo=\* --enablerepo=elrepo-kernel install -y {}",
        flavor.tools_package()
    ))?;

    console::note("Wait for 5 seconds to reboot");
    for n in (1..=5).rev() {
        thread::sleep(Duration::from_secs(1));
        console::note(&n.to_string());
    }
    console::note("Reboot now!");
    process::run("reboot")?;

    Ok(())
}

/// Make the elrepo-kernel repository available.
///
/// The fresh-install path (list the repo, install the release package) is
/// allowed to fail; the fallback updates an already-present release
/// package instead. One fallback, no loop.
fn enable_elrepo() -> Result<()> {
    match try_fresh_install() {
        Ok(()) => Ok(()),
        Err(_) => {
            console::note("\nPreparing to update ELRepo");
            process::run(ELREPO_UPDATE)
        }
    }
}

fn try_fresh_install() -> Result<()> {
    process::run(ELREPO_LIST)?;
    console::note("\nPreparing to install ELRepo");
    process::run(ELREPO_INSTALL)
}
