//! Logger setup for the command line tools.

use anyhow::Result;

/// Log to stderr at `level`, else at the level `RUST_LOG` names, else `info`
pub fn setup_logging(level: Option<&str>) -> Result<()> {
    let logger = match level {
        Some(level) => flexi_logger::Logger::try_with_str(level)?,
        None => flexi_logger::Logger::try_with_env_or_str("info")?,
    };
    logger
        .log_to_stderr()
        .format(flexi_logger::colored_default_format)
        .start()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_with_level() {
        setup_logging(Some("debug")).unwrap();
        log::debug!("logger ready");
    }
}
