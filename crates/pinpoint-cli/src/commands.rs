//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pinpoint: find robust CSS and XPath locators for HTML elements
#[derive(Parser, Debug)]
#[command(name = "pinpoint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Engine configuration file (YAML, or JSON with a .json extension)
    #[arg(short, long, global = true, env = "PINPOINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize and rank locators for one element
    Inspect(InspectArgs),

    /// Count the elements a CSS or XPath expression selects
    Evaluate(EvaluateArgs),

    /// Print the refinement prompt for one element
    RefineRequest(RefineRequestArgs),

    /// Ask a chat-completion endpoint to refine an element's locators
    Refine(RefineArgs),

    /// Show the effective engine configuration
    Config(ConfigArgs),
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// HTML document to inspect
    pub file: PathBuf,

    /// CSS selector or XPath selecting the element (first match is used)
    #[arg(short, long)]
    pub target: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Extra XPath expressions for the generic candidate pool
    #[arg(long = "pool", value_name = "XPATH")]
    pub pool: Vec<String>,

    /// Print only the best locator
    #[arg(long)]
    pub best_only: bool,
}

/// Arguments for the evaluate command
#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// HTML document
    pub file: PathBuf,

    /// CSS selector or XPath expression
    pub expression: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the refine-request command
#[derive(Parser, Debug)]
pub struct RefineRequestArgs {
    /// HTML document
    pub file: PathBuf,

    /// CSS selector or XPath selecting the element
    #[arg(short, long)]
    pub target: String,

    /// Print the JSON payload instead of the prompt text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the refine command
#[derive(Parser, Debug)]
pub struct RefineArgs {
    /// HTML document
    pub file: PathBuf,

    /// CSS selector or XPath selecting the element
    #[arg(short, long)]
    pub target: String,

    /// Base URL of an OpenAI-compatible server
    #[arg(
        long,
        env = "PINPOINT_LLM_URL",
        default_value = "http://localhost:11434"
    )]
    pub endpoint: String,

    /// Model name
    #[arg(short, long, env = "PINPOINT_LLM_MODEL", default_value = "llama3")]
    pub model: String,

    /// Bearer token
    #[arg(long, env = "PINPOINT_LLM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

/// Output format for command results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
