// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! Log module sets up file logging for the adapter, reference
//! https://docs.rs/log4rs
//!
//! The adapter only emits records through the `log` macros; hosts that want
//! them on disk call `init_log` (or `init_log_from_config`) once.

use crate::config::AdapterConfig;
use crate::error::Result;
use log::LevelFilter;

#[cfg(file_log)]
use crate::error::Error;
#[cfg(file_log)]
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

/// init logs system
#[cfg(file_log)]
pub fn init_log(level: LevelFilter, file_path: &str) -> Result<()> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
        )))
        .build(file_path)
        .map_err(|e| Error::Log(format!("{}: {}", file_path, e)))?;
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .map_err(|e| Error::Log(e.to_string()))?;
    log4rs::init_config(config).map_err(|e| Error::Log(e.to_string()))?;
    Ok(())
}

/// Without log4rs records go to whatever logger the host installed.
#[cfg(not(file_log))]
pub fn init_log(level: LevelFilter, _file_path: &str) -> Result<()> {
    log::set_max_level(level);
    Ok(())
}

pub fn init_log_from_config(cfg: &AdapterConfig) -> Result<()> {
    init_log(cfg.level_filter(), &cfg.log_file)
}

#[cfg(all(test, file_log))]
mod tests {
    use super::*;

    #[test]
    fn test_init_log_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tic_r.log");
        let path = path.to_str().unwrap();
        assert!(init_log(LevelFilter::Debug, path).is_ok());
        log::info!("hello from tic_r");
        // a logger is already installed
        assert!(matches!(init_log(LevelFilter::Info, path), Err(Error::Log(_))));
    }
}
