use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "portfolio")]
#[command(about = "Render and preview the portfolio page")]
#[command(version)]
pub struct Cli {
    /// Write rolling log files to this absolute directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true, env = "PORTFOLIO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the static page with every section revealed
    Render {
        #[command(flatten)]
        source: ConfigSource,

        /// Output file (stdout if omitted)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
    /// Show which nav entry is active for a simulated scroll
    Preview {
        #[command(flatten)]
        source: ConfigSource,

        #[command(flatten)]
        position: PreviewPosition,

        /// Simulated viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        viewport_height: f64,

        /// Simulated height of every section in pixels
        #[arg(long, default_value_t = 1000.0)]
        section_height: f64,
    },
    /// Validate a config file
    Check {
        #[command(flatten)]
        source: ConfigSource,
    },
}

/// Config file selection shared by subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSource {
    /// JSON config file (built-in portfolio if omitted)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

/// Where the preview viewport ends up.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PreviewPosition {
    /// Smooth-scroll to this section, as a nav click would
    #[arg(long)]
    pub scroll_to: Option<String>,

    /// Scroll offset from the top of the page in pixels
    #[arg(long, allow_negative_numbers = true)]
    pub offset: Option<f64>,
}
