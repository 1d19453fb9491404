use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::process;

use bundlemap::analyzer::SizeKind;
use bundlemap::cmd;

/// Bundle stats to treemap chart data composer
///
/// bundlemap reads a bundler's stats JSON and composes a hierarchical size
/// report per output asset, at declared, parsed and gzip size metrics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a bundler stats file
    Analyze {
        /// Path to the stats JSON file
        #[arg(value_name = "STATS_FILE")]
        stats_file: String,

        /// Bundle output directory (enables real parsed/gzip sizes)
        #[arg(short = 'd', long)]
        bundle_dir: Option<String>,

        /// Exclude assets matching this pattern (repeatable, regex)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Size metric the report leads with
        #[arg(long, value_enum, default_value = "parsed")]
        default_sizes: SizeKind,

        /// Output chart data as JSON instead of the console report
        #[arg(long)]
        json: bool,

        /// Write chart data JSON to a file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Analyze {
            stats_file,
            bundle_dir,
            exclude,
            default_sizes,
            json,
            output,
        }) => cmd::cmd_analyze(
            stats_file,
            bundle_dir.as_deref(),
            exclude,
            *default_sizes,
            *json,
            output.as_deref(),
        ),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("bundlemap v{}", env!("CARGO_PKG_VERSION"));
            println!("Bundle stats to treemap chart data composer\n");
            println!("Usage: bundlemap <COMMAND>\n");
            println!("Commands:");
            println!("  analyze      Analyze a bundler stats file");
            println!("  completions  Generate shell completions");
            println!("\nRun 'bundlemap <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use bundlemap::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
