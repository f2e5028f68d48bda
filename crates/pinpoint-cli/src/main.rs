//! Pinpoint CLI: locator synthesis from the command line
//!
//! ## Usage
//!
//! ```bash
//! pinpoint inspect page.html --target '#email'        # Rank locators for an element
//! pinpoint inspect page.html -t '(//a)[2]' -f json    # Same, as JSON
//! pinpoint evaluate page.html '//li[@class="item"]'   # Count matches
//! pinpoint refine-request page.html -t button         # Print the refinement prompt
//! pinpoint config > pinpoint.yaml                     # Dump the default configuration
//! ```

use clap::Parser;
use pinpoint_cli::{handlers, logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    logging::init_logging(config.verbosity);
    console::set_colors_enabled(config.use_color());

    match cli.command {
        Commands::Inspect(args) => handlers::execute_inspect(&config, &args),
        Commands::Evaluate(args) => handlers::execute_evaluate(&config, &args),
        Commands::RefineRequest(args) => handlers::execute_refine_request(&config, &args),
        Commands::Refine(args) => handlers::execute_refine(&config, &args),
        Commands::Config(args) => handlers::execute_config(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_engine_config(cli.config.clone())
}
