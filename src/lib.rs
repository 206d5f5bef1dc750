// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! tic_r lets the TIC-80 fantasy console run carts written in R.
//!
//! The R interpreter is embedded in the host process. The adapter turns host
//! lifecycle events (init, boot, tick, scanline, border, menu) into calls of
//! the cart's functions in R's global environment, and provides the syntax
//! tables and function outline the code editor uses.
//!
//! ```text
//! descriptor  - language slot 21, editor tables, bundled carts
//! script      - RScript: lifecycle hooks and console eval
//! session     - owned interpreter session (start/stop/attach)
//! bridge      - every R snippet the adapter evaluates
//! interp      - Interpreter trait, recording and embedded backends
//! host        - Host trait, trace trampoline, fatal path
//! outline     - `<- function(` outline for the editor
//! syntax      - identifier classes and keyword lists
//! ```
//!
//! # Example
//!
//! ```
//! use tic_r::{Host, RScript, RecordingInterpreter};
//!
//! struct Console;
//! impl Host for Console {
//!     fn trace(&mut self, text: &str, _color: u8) {
//!         eprintln!("{}", text);
//!     }
//! }
//!
//! let mut script = RScript::new(RecordingInterpreter::new());
//! assert!(script.init(&mut Console, "`TIC-80` <- function() cls(0)"));
//! script.tick(&mut Console);
//! script.close(&mut Console);
//! ```
//!
//! With the `embedded-r` feature, `EmbeddedR` runs carts in a real R and the
//! `ffi` module exports the `tic_r_*` C entry points.

/// R source snippets: guarded calls, forwarding shims, BOOT fallback
pub mod bridge;

/// TOML configuration: argv, startup attempts, environment, logging
pub mod config;

/// the registration record the host consumes
pub mod descriptor;

/// interpreter environment variables
pub mod env;

pub mod error;

/// host seam: trace sink, api calls, fatal error path
pub mod host;

/// interpreter seam and backends
pub mod interp;

/// log
pub mod log;

/// editor function outline
pub mod outline;

/// lifecycle and evaluator bridge
pub mod script;

/// interpreter session state machine
pub mod session;

/// identifier classes and keyword tables
pub mod syntax;

/// C entry points over the embedded R backend
#[cfg(embedded_r)]
pub mod ffi;

pub use bridge::{BridgeCall, Callback, RValue};
pub use config::AdapterConfig;
pub use descriptor::{descriptor, RomBlob, ScriptDescriptor, R_SCRIPT};
pub use error::{Error, Result};
pub use host::{Host, TRACE_COLOR};
pub use interp::{ApiValue, Interpreter, NativeCall, NativeSink, Reaction, RecordingInterpreter};
#[cfg(embedded_r)]
pub use interp::EmbeddedR;
pub use outline::{OutlineItem, Outliner};
pub use script::RScript;
pub use session::{RuntimeState, Session};
pub use syntax::is_ident_char;
