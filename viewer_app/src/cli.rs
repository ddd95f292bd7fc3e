//! Command-line interface
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene_viewer_demo")]
#[command(about = "Scene viewer demo: a steerable camera window and an image window", long_about = None)]
pub struct Cli {
    /// Viewer configuration file (.toml or .ron)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Run without opening native windows
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many ticks (headless runs default to 120)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Log filter, e.g. "debug" or "scene_viewer=trace"
    #[arg(long)]
    pub log: Option<String>,
}
