//! `itemvault completions` — generate shell completion scripts.
//!
//! Usage:
//!   itemvault completions bash > ~/.bash_completion.d/itemvault
//!   itemvault completions zsh
//!   itemvault completions fish
//!   itemvault completions powershell

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    write_completions(shell, &mut io::stdout());
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}
