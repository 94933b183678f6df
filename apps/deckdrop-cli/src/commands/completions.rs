//! Shell completion scripts

use clap::CommandFactory;
use clap_complete::Shell;
use std::io;

/// Write the completion script for `shell` to stdout
pub fn run(shell: Shell) {
    let mut cmd = crate::Cli::command();
    let bin_name = cmd.get_name().to_string();

    clap_complete::generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
