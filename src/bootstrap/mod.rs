//! Node bootstrap sequence.
//!
//! Fixed linear steps: probe the host, classify the network, then
//! hostname, Docker, kubectl, k3s. Each step is gated by prior probe or
//! prompt results; everything the steps need travels in one [`Context`]
//! built up front.

pub mod docker;
pub mod k3s;
pub mod kubectl;

use std::path::Path;

use anyhow::Result;

use crate::netcheck::{self, MirrorSet};
use crate::options::RunOptions;
use crate::probe::{self, Tool, ToolStatus};
use crate::prompt::Prompter;
use crate::{console, preflight, process};

/// Run-wide state, built once before the first mutating step.
#[derive(Debug)]
pub struct Context {
    pub options: RunOptions,
    pub prompter: Prompter,
    pub inventory: Vec<ToolStatus>,
    pub mirrors: MirrorSet,
}

impl Context {
    /// Probed install path for a tool, if present on the host.
    pub fn tool_path(&self, tool: Tool) -> Option<&Path> {
        self.inventory
            .iter()
            .find(|status| status.tool == tool)
            .and_then(|status| status.path.as_deref())
    }

    /// Probed version for a tool, if one was extracted.
    pub fn tool_version(&self, tool: Tool) -> Option<&str> {
        self.inventory
            .iter()
            .find(|status| status.tool == tool)
            .and_then(|status| status.version.as_deref())
    }
}

/// Run the full bootstrap sequence.
pub fn run(options: RunOptions) -> Result<()> {
    preflight::check_required_tools(preflight::BOOTSTRAP_TOOLS)?;

    console::note("\nPrepare Info");
    let inventory = probe::probe_tools();
    print!("{}", probe::render_inventory(&inventory));

    let mirrors = netcheck::mirror_set_for(netcheck::classify(netcheck::GEO_ENDPOINT));
    match mirrors {
        MirrorSet::Restricted => console::note("Using in-region mirrors for downloads"),
        MirrorSet::Global => console::note("Using default mirrors for downloads"),
    }

    let ctx = Context {
        options,
        prompter: Prompter::new(options.assume_yes),
        inventory,
        mirrors,
    };

    set_hostname(&ctx)?;
    docker::install(&ctx)?;
    kubectl::install(&ctx)?;
    k3s::install(&ctx)?;

    console::note("\nNode bootstrap complete.");
    Ok(())
}

fn set_hostname(ctx: &Context) -> Result<()> {
    console::section("Hostname");

    match ctx.prompter.ask("Enter a hostname (empty keeps the current one):")? {
        Some(hostname) => {
            console::note(&format!("Set hostname to {}", hostname));
            process::run(&format!("hostnamectl set-hostname {}", hostname))
        }
        None => Ok(()),
    }
}
