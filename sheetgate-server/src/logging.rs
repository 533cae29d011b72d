//! Logger setup

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::ConfigBuilder;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::error::ConfigError;

/// Logs to the terminal and appends to `log_file`.
///
/// HTTP client internals are filtered out; they log every connection.
pub fn init(level: LevelFilter, log_file: &Path) -> Result<(), ConfigError> {
    let file = File::options().create(true).append(true).open(log_file)?;

    let config = ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("rustls")
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, config, file),
    ])?;

    Ok(())
}
