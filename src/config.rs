// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! Adapter configuration, read from a TOML file.
//!
//! Every key is optional; missing keys keep the defaults below.
//!
//! ```toml
//! argv = ["TIC-80", "--quiet", "--vanilla"]
//! max_start_attempts = 3
//! trace_color = 15
//! log_level = "info"
//! log_file = "log/tic_r.log"
//!
//! [env]
//! R_HOME = "/usr/lib/R"
//! ```

use crate::error::{Error, Result};
use crate::host::TRACE_COLOR;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

#[cfg(target_os = "macos")]
const DEFAULT_R_HOME: &str = "/Library/Frameworks/R.framework/Resources";
#[cfg(target_os = "windows")]
const DEFAULT_R_HOME: &str = "C:\\Program Files\\R\\R-4.4.0";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const DEFAULT_R_HOME: &str = "/usr/lib/R";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Argument vector R is started with.
    pub argv: Vec<String>,
    /// Startup attempts before init reports failure.
    pub max_start_attempts: u32,
    /// Palette color of adapter trace lines.
    pub trace_color: u8,
    /// Environment variables set at startup when unset.
    pub env: BTreeMap<String, String>,
    pub log_level: String,
    pub log_file: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            argv: vec!["TIC-80".into(), "--quiet".into(), "--vanilla".into()],
            max_start_attempts: 3,
            trace_color: TRACE_COLOR,
            env: BTreeMap::from([("R_HOME".to_string(), DEFAULT_R_HOME.to_string())]),
            log_level: "info".to_string(),
            log_file: format!("log{}tic_r.log", std::path::MAIN_SEPARATOR),
        }
    }
}

impl AdapterConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: AdapterConfig = toml::from_str(s)?;
        // zero attempts would make init fail without trying
        cfg.max_start_attempts = cfg.max_start_attempts.max(1);
        cfg.trace_color = cfg.trace_color.min(TRACE_COLOR);
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// `log_level` as a filter, `Info` when unrecognized.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
