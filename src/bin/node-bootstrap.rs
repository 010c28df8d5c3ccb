use anyhow::Result;

use node_bootstrap::options::{self, Invocation};
use node_bootstrap::{bootstrap, process};

fn usage() -> &'static str {
    "Bootstrap this host into a k3s Kubernetes node.\n\n\
     Usage:\n  node-bootstrap [options]\n\n\
     Options:\n  \
     -y, --yes, --force   answer yes to every confirmation\n      \
     --agent          join an existing cluster instead of initializing one\n                       \
     (reads K3S_URL and K3S_TOKEN, prompting for missing values)\n  \
     -h, --help           show this help\n\n\
     Requires a yum-based host with a POSIX shell."
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(err) = run(&args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(process::exit_code(&err).unwrap_or(1));
    }
}

fn run(args: &[String]) -> Result<()> {
    match options::parse_invocation(args, true, usage())? {
        Invocation::Help => {
            println!("{}", usage());
            Ok(())
        }
        Invocation::Run(opts) => bootstrap::run(opts),
    }
}
