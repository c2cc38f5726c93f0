//! xpgen CLI - Crossplane composition generator
//!
//! Discovers per-resource generator files, resolves them against a
//! global configuration, fetches the provider CRD, and materializes
//! composition manifests through the templating engine.

use clap::Parser;
use miette::Result;
use std::path::PathBuf;

mod discovery;
mod generate;

#[derive(Parser)]
#[command(name = "xpgen")]
#[command(author = "xpgen Contributors")]
#[command(version)]
#[command(about = "Generate Crossplane composition manifests from provider CRDs", long_about = None)]
struct Cli {
    /// Input filename to search for below the input path
    #[arg(long, default_value = "generate.yaml")]
    input_name: String,

    /// Root path searched for resource definition files
    #[arg(long, default_value = ".")]
    input_path: PathBuf,

    /// Script filename to execute against input file(s)
    /// (default: generate.j2 or specified in each input file)
    #[arg(long)]
    script_name: Option<String>,

    /// Path where script files are loaded from
    /// (default: functions/ next to the executable)
    #[arg(long)]
    script_path: Option<PathBuf>,

    /// Path where output files are created
    /// (default: same directory as input file)
    #[arg(long)]
    output_path: Option<PathBuf>,

    /// Path to the global generator configuration
    #[arg(long, default_value = "./generator-config.yaml")]
    config_file: PathBuf,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    let script_path = cli.script_path.unwrap_or_else(default_script_path);

    generate::run(&generate::Options {
        input_name: cli.input_name,
        input_path: cli.input_path,
        script_name: cli.script_name,
        script_path,
        output_path: cli.output_path,
        config_file: cli.config_file,
        debug: cli.debug,
    })
}

/// Scripts ship alongside the binary in a `functions/` directory.
fn default_script_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("functions")
}
