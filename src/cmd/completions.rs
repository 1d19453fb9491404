//! Completions command implementation
//!
//! Handles the `bundlemap completions` command which generates shell
//! completion scripts for bash, zsh, fish, etc.

use clap_complete::{generate, Shell};

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// bundlemap completions bash > /etc/bash_completion.d/bundlemap
///
/// # Zsh
/// bundlemap completions zsh > ~/.zfunc/_bundlemap
/// ```
pub fn cmd_completions(shell: Shell) {
    // We need to re-create the command structure here since Cli is in main.rs
    use clap::Command;

    let mut cmd = Command::new("bundlemap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bundle stats to treemap chart data composer")
        .subcommand(Command::new("analyze").about("Analyze a bundler stats file"))
        .subcommand(Command::new("completions").about("Generate shell completions"));

    let bin_name = "bundlemap".to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
