//! Config command handler

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::CliResult;

/// Effective engine configuration, rendered as YAML or JSON.
pub fn render_config(config: &CliConfig, json: bool) -> CliResult<String> {
    let engine_config = config.load_engine_config()?;
    if json {
        Ok(serde_json::to_string_pretty(&engine_config)?)
    } else {
        Ok(engine_config.to_yaml()?)
    }
}

/// Execute the config command
pub fn execute_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    if config.verbosity.is_verbose() {
        match &config.engine_config {
            Some(path) => eprintln!("# from {}", path.display()),
            None => eprintln!("# built-in defaults"),
        }
    }
    println!("{}", render_config(config, args.json)?.trim_end());
    Ok(())
}
