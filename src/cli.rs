use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "license-gate",
    about = "Check NuGet dependency licenses against an organizational policy",
    version
)]
pub struct Cli {
    /// Project path to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Allow-list file [default: <project>/Allowed.Licenses.txt]
    #[arg(long, value_name = "FILE")]
    pub allow_list: Option<PathBuf>,

    /// License cache file [default: <project>/licenses.cache]
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Neither read nor write the license cache
    #[arg(long)]
    pub no_cache: bool,

    /// Config file [default: ./.license-gate/config.toml, fallback ~/.config/license-gate/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show every examined package and its resolved license
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
