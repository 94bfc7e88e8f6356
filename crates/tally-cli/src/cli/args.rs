use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Consolidate surefire test reports into versioned JSON and index them for the frontend"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process one surefire reports directory into a consolidated report
    Process(ProcessArgs),
    /// Rebuild the manifest of available summary.json files
    Manifest(ManifestArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ProcessArgs {
    /// Database type used in the output filename
    #[arg(default_value = "postgres")]
    pub db_type: String,

    /// Directory containing surefire reports; relative paths resolve
    /// against the executable's directory
    #[arg(long, default_value = "surefire-reports")]
    pub reports_dir: PathBuf,

    /// Output directory for processed results
    #[arg(long, short = 'o', default_value = "results")]
    pub output_dir: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ManifestArgs {}
