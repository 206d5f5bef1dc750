// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! Error types shared by the adapter.
//!
//! User-script errors never leave the adapter as an `Err`: the lifecycle
//! hooks turn them into trace output, the way the interpreter would print
//! them. Everything else is returned to the caller.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The interpreter refused to start after every attempt.
    #[error("interpreter failed to start after {attempts} attempt(s): {reason}")]
    Start { attempts: u32, reason: String },

    /// An evaluation was submitted before the interpreter was running.
    #[error("interpreter is not started")]
    NotStarted,

    /// The interpreter was shut down and cannot be brought back in this process.
    #[error("interpreter cannot be restarted once shut down")]
    RestartUnsupported,

    /// Unrecoverable interpreter failure; see `host::fatal`.
    #[error("fatal interpreter error: {0}")]
    Fatal(String),

    /// Error raised by user code while evaluating.
    #[error("{0}")]
    Eval(String),

    /// The outline result buffer could not grow.
    #[error("out of memory while collecting outline items")]
    OutOfMemory,

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log setup: {0}")]
    Log(String),
}

pub type Result<T> = std::result::Result<T, Error>;
