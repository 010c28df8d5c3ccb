//! Host tool inventory.
//!
//! Before anything mutating runs, both the operator and the later steps
//! need to know which of the managed tools are already on the host and at
//! what version. Each probe is fully isolated: an absent tool records
//! empty fields, a version command that fails or prints something
//! unexpected leaves the version empty, and neither ever aborts the
//! remaining probes.

use regex::Regex;
use std::fmt;
use std::path::PathBuf;

use crate::process;

/// The tools the bootstrap flow cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Docker,
    Kubectl,
    Helm,
}

impl Tool {
    /// The fixed probe set, in display order.
    pub const ALL: [Tool; 3] = [Tool::Docker, Tool::Kubectl, Tool::Helm];

    /// Executable name as searched on PATH.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Docker => "docker",
            Tool::Kubectl => "kubectl",
            Tool::Helm => "helm",
        }
    }

    /// Command whose output carries the tool's version.
    pub fn version_command(self) -> &'static str {
        match self {
            Tool::Docker => "docker --version",
            Tool::Kubectl => "kubectl version --client --output=yaml",
            Tool::Helm => "helm version",
        }
    }

    /// Pattern matching the version number in the command's output.
    fn version_pattern(self) -> &'static str {
        match self {
            Tool::Docker => r"Docker version ([\d.]+)",
            Tool::Kubectl => r"gitVersion: v(\S+)",
            Tool::Helm => r#"Version:"v([\d.]+)""#,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f.pad, not write_str, so the inventory column widths apply.
        f.pad(self.name())
    }
}

/// Probe result for one tool. Both fields empty means "not installed";
/// a path without a version means the version output didn't match.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub tool: Tool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
}

/// Extract a normalized `v`-prefixed version from a version command's raw
/// output. Returns `None` when the output doesn't match the tool's
/// expected format.
pub fn extract_version(tool: Tool, raw: &str) -> Option<String> {
    let pattern = Regex::new(tool.version_pattern()).ok()?;
    let captured = pattern.captures(raw)?.get(1)?.as_str();
    Some(format!("v{}", captured))
}

fn probe_named(tool: Tool, executable: &str) -> ToolStatus {
    let path = which::which(executable).ok();
    let version = if path.is_some() {
        process::run_captured(tool.version_command())
            .ok()
            .and_then(|raw| extract_version(tool, &raw))
    } else {
        None
    };

    ToolStatus { tool, path, version }
}

fn probe_tool(tool: Tool) -> ToolStatus {
    probe_named(tool, tool.name())
}

/// Probe every tool in [`Tool::ALL`], sequentially.
pub fn probe_tools() -> Vec<ToolStatus> {
    Tool::ALL.iter().map(|tool| probe_tool(*tool)).collect()
}

/// Render the inventory as an aligned table for the operator. Absent
/// fields display as `-`.
pub fn render_inventory(statuses: &[ToolStatus]) -> String {
    let path_width = statuses
        .iter()
        .map(|s| s.path.as_ref().map(|p| p.display().to_string().len()).unwrap_or(1))
        .max()
        .unwrap_or(4)
        .max("PATH".len());

    let mut out = format!("  {:<10} {:<width$} VERSION\n", "TOOL", "PATH", width = path_width);
    for status in statuses {
        let path = status
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let version = status.version.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "  {:<10} {:<width$} {}\n",
            status.tool,
            path,
            version,
            width = path_width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_version_extracts() {
        let raw = "Docker version 20.10.7, build f0df350";
        assert_eq!(extract_version(Tool::Docker, raw), Some("v20.10.7".into()));
    }

    #[test]
    fn kubectl_version_extracts_from_yaml() {
        let raw = "clientVersion:\n  gitVersion: v1.28.1\n  major: \"1\"\n  minor: \"28\"\n";
        assert_eq!(extract_version(Tool::Kubectl, raw), Some("v1.28.1".into()));
    }

    #[test]
    fn kubectl_version_extracts_without_trailing_newline() {
        let raw = "gitVersion: v1.27.4";
        assert_eq!(extract_version(Tool::Kubectl, raw), Some("v1.27.4".into()));
    }

    #[test]
    fn helm_version_extracts() {
        let raw = r#"version.BuildInfo{Version:"v3.12.3", GitCommit:"3a31588"}"#;
        assert_eq!(extract_version(Tool::Helm, raw), Some("v3.12.3".into()));
    }

    #[test]
    fn mismatched_output_yields_none() {
        assert_eq!(extract_version(Tool::Docker, "command not found"), None);
        assert_eq!(extract_version(Tool::Helm, "Docker version 20.10.7"), None);
        assert_eq!(extract_version(Tool::Kubectl, ""), None);
    }

    #[test]
    fn tool_displays_as_executable_name() {
        assert_eq!(Tool::Kubectl.to_string(), "kubectl");
        // Width specs must reach the impl; the inventory columns rely on it.
        assert_eq!(format!("{:<10}", Tool::Helm), "helm      ");
    }

    #[test]
    fn absent_tool_has_both_fields_empty() {
        let status = probe_named(Tool::Helm, "definitely_not_a_real_command_12345");
        assert!(status.path.is_none());
        assert!(status.version.is_none());
    }

    #[test]
    fn inventory_renders_dashes_for_absent_tools() {
        let statuses = vec![
            ToolStatus {
                tool: Tool::Docker,
                path: Some(PathBuf::from("/usr/bin/docker")),
                version: Some("v20.10.7".into()),
            },
            ToolStatus {
                tool: Tool::Helm,
                path: None,
                version: None,
            },
        ];

        let table = render_inventory(&statuses);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("TOOL"));
        assert!(lines[1].contains("/usr/bin/docker"));
        assert!(lines[1].contains("v20.10.7"));
        assert!(lines[2].contains("helm"));
        assert!(lines[2].contains('-'));
    }
}
