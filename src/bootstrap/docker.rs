//! Docker install step.
//!
//! Reinstallation runs by default; a probed existing install asks the
//! operator first, and declining keeps the host untouched. The liveness
//! check at the end runs either way.

use anyhow::Result;

use super::Context;
use crate::netcheck::MirrorSet;
use crate::probe::Tool;
use crate::{console, process};

const REMOVE: &str = "yum -y remove docker-*";
const INSTALL_RESTRICTED: &str = "curl -sSL https://get.daocloud.io/docker | sh";
const INSTALL_GLOBAL: &str = "curl -fsSL https://get.docker.com | bash -s docker --mirror Aliyun";
const ENABLE: &str = "systemctl enable --now docker";
const CHECK: &str = "docker ps";

pub fn install(ctx: &Context) -> Result<()> {
    console::section("Docker");

    let reinstall = match ctx.tool_version(Tool::Docker) {
        Some(version) => ctx
            .prompter
            .confirm(&format!("docker {} is installed. Replace it?", version))?,
        None => true,
    };

    if reinstall {
        console::step("Remove existing docker");
        process::run(REMOVE)?;

        console::step("Install docker (this can take a while)");
        process::run(install_command(ctx.mirrors))?;

        console::step("Enable docker on boot");
        process::run(ENABLE)?;
    }

    console::step("Check");
    process::run(CHECK)?;

    Ok(())
}

fn install_command(mirrors: MirrorSet) -> &'static str {
    match mirrors {
        MirrorSet::Restricted => INSTALL_RESTRICTED,
        MirrorSet::Global => INSTALL_GLOBAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_command_follows_mirror_set() {
        assert!(install_command(MirrorSet::Restricted).contains("get.daocloud.io"));
        assert!(install_command(MirrorSet::Global).contains("get.docker.com"));
    }
}
