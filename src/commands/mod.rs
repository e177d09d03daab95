//! Command implementation for dictgen.
//!
//! Resolves the effective configuration (file, then CLI overrides) and runs
//! the lock-guarded generator.


use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::generate::{self, GenerateOptions, GenerateReport};

/// Run dictgen for the parsed command line.
///
/// A command line with fewer than three positionals prints usage and
/// succeeds without touching the filesystem.
pub fn dispatch(cli: Cli) -> Result<()> {
    let Some(request) = cli.request()? else {
        println!("{}", Cli::usage());
        return Ok(());
    };

    let config = resolve_config(&cli)?;
    let options = GenerateOptions::from_config(&config);

    let mut stdout = std::io::stdout().lock();
    match generate::generate(&request, &options, &mut stdout)? {
        GenerateReport::Generated { outcome } => tracing::info!(
            dict = %request.target.display(),
            status = %outcome.status_description(),
            "dictionary generated"
        ),
        GenerateReport::Waited { waited } => tracing::info!(
            dict = %request.target.display(),
            waited_ms = waited.as_millis() as u64,
            "dictionary generated by another job"
        ),
    }

    Ok(())
}

/// Load the config file (if any) and apply command-line overrides.
pub(crate) fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if cli.strict {
        config.propagate_tool_failure = true;
    }
    if let Some(secs) = cli.wait_timeout {
        config.wait_timeout_secs = secs;
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(secs) = cli.tool_timeout {
        config.tool_timeout_secs = secs;
    }

    config.validate()?;
    tracing::debug!(?config, "effective configuration");
    Ok(config)
}
