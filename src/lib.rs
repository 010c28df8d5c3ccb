//! Interactive provisioning for Kubernetes worker nodes on yum-based hosts.
//!
//! Two binaries share the building blocks in this crate:
//!
//! - **node-bootstrap** - probe docker/kubectl/helm, then install Docker,
//!   kubectl, and k3s, writing the k3s systemd unit with the node IP
//!   pinned into the server flags
//! - **kernel-upgrade** - upgrade a CentOS 7.x kernel from the ELRepo
//!   kernel repository and reboot
//!
//! # Architecture
//!
//! ```text
//! bin (node-bootstrap / kernel-upgrade)
//!     │
//!     ├── options   - run flags (force mode, agent mode)
//!     ├── preflight - required host-tool validation
//!     ├── probe     - tool inventory (path + version)
//!     ├── netcheck  - mirror classification, public IP
//!     ├── prompt    - operator confirmations and questions
//!     └── process   - shell execution (stream / capture)
//!
//! bootstrap / kernel - the fixed step sequences on top
//! ```
//!
//! Every mutating action shells out through [`process`]; both sequences
//! are strictly linear, with branching decided only by probe results,
//! operator answers, and the one up-front network classification.
//!
//! # Preconditions
//!
//! A POSIX shell (`sh`) and a yum-based distribution. These are checked by
//! [`preflight`] at the start of each run, not abstracted over.

pub mod bootstrap;
pub mod console;
pub mod kernel;
pub mod netcheck;
pub mod options;
pub mod preflight;
pub mod probe;
pub mod process;
pub mod prompt;

pub use netcheck::MirrorSet;
pub use options::RunOptions;
pub use probe::{Tool, ToolStatus};
pub use process::CommandFailure;
