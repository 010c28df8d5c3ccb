use anyhow::Result;

use node_bootstrap::options::{self, Invocation};
use node_bootstrap::{kernel, process};

fn usage() -> &'static str {
    "Upgrade a CentOS 7.x host kernel from the ELRepo kernel repository.\n\n\
     Usage:\n  kernel-upgrade [options]\n\n\
     Options:\n  \
     -y, --yes, --force   answer yes to every confirmation and take defaults\n  \
     -h, --help           show this help\n\n\
     The host reboots at the end of a successful run."
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(err) = run(&args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(process::exit_code(&err).unwrap_or(1));
    }
}

fn run(args: &[String]) -> Result<()> {
    match options::parse_invocation(args, false, usage())? {
        Invocation::Help => {
            println!("{}", usage());
            Ok(())
        }
        Invocation::Run(opts) => kernel::run(opts),
    }
}
