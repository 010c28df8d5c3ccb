//! k3s install step.
//!
//! Server mode initializes a new cluster: run the installer, confirm the
//! node's public IP, write the systemd unit with that IP pinned into the
//! server flags, and restart the service. Agent mode joins an existing
//! cluster using `K3S_URL` and `K3S_TOKEN`, prompting for whichever is
//! missing from the environment. Both modes run the installer against
//! docker and pick the installer endpoint from the mirror classification.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context as _, Result};

use super::Context;
use crate::netcheck::{self, MirrorSet};
use crate::{console, process};

const INSTALLER_RESTRICTED: &str =
    "https://rancher-mirror.oss-cn-beijing.aliyuncs.com/k3s/k3s-install.sh";
const INSTALLER_GLOBAL: &str = "https://get.k3s.io";
const UNIT_PATH: &str = "/etc/systemd/system/k3s.service";

pub fn install(ctx: &Context) -> Result<()> {
    console::section("K3S");

    if ctx.options.agent {
        join_cluster(ctx)
    } else {
        init_cluster(ctx)
    }
}

fn init_cluster(ctx: &Context) -> Result<()> {
    console::step("Install k3s server (this can take a while)");
    process::run(&server_command(ctx.mirrors))?;

    let node_ip = confirm_node_ip(ctx)?;

    console::step("Write k3s service unit");
    write_unit(Path::new(UNIT_PATH), &node_ip)?;

    console::step("Restart k3s");
    process::run("systemctl daemon-reload")?;
    process::run("systemctl restart k3s")?;

    Ok(())
}

fn join_cluster(ctx: &Context) -> Result<()> {
    let url = join_param(ctx, "K3S_URL", "K3S_URL (https://<server>:6443):")?;
    let token = join_param(ctx, "K3S_TOKEN", "K3S_TOKEN (from the server's node-token):")?;

    console::step("Install k3s agent (this can take a while)");
    process::run(&agent_command(ctx.mirrors, &url, &token))?;

    Ok(())
}

/// Resolve a join parameter from the environment, falling back to a
/// required prompt.
fn join_param(ctx: &Context, var: &str, question: &str) -> Result<String> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => ctx.prompter.ask_required(question),
    }
}

/// Ask the operator to confirm the detected public IP, or to supply one
/// when detection failed.
fn confirm_node_ip(ctx: &Context) -> Result<String> {
    match netcheck::public_ip(netcheck::IP_ENDPOINT) {
        Ok(detected) => ctx.prompter.ask_with_default("Node IP:", &detected),
        Err(err) => {
            if ctx.options.assume_yes {
                bail!("could not detect the node IP ({:#}); rerun without --yes to enter it", err);
            }
            ctx.prompter.ask_required("Node IP (detection failed, enter manually):")
        }
    }
}

fn server_command(mirrors: MirrorSet) -> String {
    match mirrors {
        MirrorSet::Restricted => format!(
            "curl -fsSL {} | INSTALL_K3S_MIRROR=cn sh -s - --docker",
            INSTALLER_RESTRICTED
        ),
        MirrorSet::Global => format!("curl -fsSL {} | sh -s - --docker", INSTALLER_GLOBAL),
    }
}

fn agent_command(mirrors: MirrorSet, url: &str, token: &str) -> String {
    match mirrors {
        MirrorSet::Restricted => format!(
            "curl -fsSL {} | INSTALL_K3S_MIRROR=cn K3S_URL={} K3S_TOKEN={} sh -s - agent --docker",
            INSTALLER_RESTRICTED, url, token
        ),
        MirrorSet::Global => format!(
            "curl -fsSL {} | K3S_URL={} K3S_TOKEN={} sh -s - agent --docker",
            INSTALLER_GLOBAL, url, token
        ),
    }
}

/// Render the k3s server unit with the node IP pinned into the TLS SAN
/// and node address flags.
pub fn render_unit(node_ip: &str) -> String {
    format!(
        "[Unit]\n\
         Description=Lightweight Kubernetes\n\
         Documentation=https://k3s.io\n\
         Wants=network-online.target\n\
         After=network-online.target\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n\
         \n\
         [Service]\n\
         Type=notify\n\
         EnvironmentFile=-/etc/systemd/system/k3s.service.env\n\
         KillMode=process\n\
         Delegate=yes\n\
         LimitNOFILE=1048576\n\
         LimitNPROC=infinity\n\
         LimitCORE=infinity\n\
         TasksMax=infinity\n\
         TimeoutStartSec=0\n\
         Restart=always\n\
         RestartSec=5s\n\
         ExecStartPre=-/sbin/modprobe br_netfilter\n\
         ExecStartPre=-/sbin/modprobe overlay\n\
         ExecStart=/usr/local/bin/k3s server --docker --tls-san {ip} --node-ip {ip} --node-external-ip {ip}\n",
        ip = node_ip
    )
}

/// Write the unit file. The previous unit, if any, is overwritten in
/// place.
pub fn write_unit(path: &Path, node_ip: &str) -> Result<()> {
    fs::write(path, render_unit(node_ip))
        .with_context(|| format!("writing k3s unit to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unit_pins_node_ip_into_server_flags() {
        let unit = render_unit("203.0.113.7");
        assert!(unit.contains("--tls-san 203.0.113.7"));
        assert!(unit.contains("--node-ip 203.0.113.7"));
        assert!(unit.contains("--node-external-ip 203.0.113.7"));
        assert_eq!(unit.matches("203.0.113.7").count(), 3);
    }

    #[test]
    fn unit_keeps_systemd_structure() {
        let unit = render_unit("10.0.0.5");
        assert!(unit.starts_with("[Unit]\n"));
        assert!(unit.contains("\n[Install]\n"));
        assert!(unit.contains("\n[Service]\n"));
        assert!(unit.contains("Type=notify\n"));
        assert!(unit.contains("ExecStart=/usr/local/bin/k3s server --docker"));
        assert!(unit.ends_with('\n'));
    }

    #[test]
    fn write_unit_overwrites_previous_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("k3s.service");

        write_unit(&path, "10.0.0.5").unwrap();
        write_unit(&path, "203.0.113.7").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("203.0.113.7"));
        assert!(!content.contains("10.0.0.5"));
    }

    #[test]
    fn installer_endpoints_follow_mirror_set() {
        assert!(server_command(MirrorSet::Restricted).contains("rancher-mirror"));
        assert!(server_command(MirrorSet::Restricted).contains("INSTALL_K3S_MIRROR=cn"));
        assert!(server_command(MirrorSet::Global).contains("get.k3s.io"));
        assert!(!server_command(MirrorSet::Global).contains("INSTALL_K3S_MIRROR"));
    }

    #[test]
    fn agent_command_passes_join_parameters() {
        let cmd = agent_command(MirrorSet::Global, "https://10.0.0.5:6443", "secret");
        assert!(cmd.contains("K3S_URL=https://10.0.0.5:6443"));
        assert!(cmd.contains("K3S_TOKEN=secret"));
        assert!(cmd.contains("sh -s - agent --docker"));
    }
}
