// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! The interpreter seam.
//!
//! `RScript` only talks to R through [`Interpreter`]. Output written by the
//! interpreter and calls coming back out of it through the native entry point
//! are delivered to a [`NativeSink`] for the duration of one `eval`.
//!
//! recording: in-process interpreter that records what it is asked to run,
//! used by tests and tools that need the adapter without R installed.
//!
//! embedded: the real R runtime through libR-sys (feature `embedded-r`).

use crate::error::Result;
use crate::host::fatal_message;

mod recording;
pub use recording::*;

#[cfg(embedded_r)]
mod embedded;
#[cfg(embedded_r)]
pub use embedded::EmbeddedR;

/// Value passed from R to the host through the native entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiValue {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
}

impl ApiValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ApiValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            ApiValue::Num(v) => Some(*v),
            ApiValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text form used when a value is traced.
    pub fn display(&self) -> String {
        match self {
            ApiValue::Null => "NULL".to_string(),
            ApiValue::Bool(true) => "TRUE".to_string(),
            ApiValue::Bool(false) => "FALSE".to_string(),
            ApiValue::Num(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
            ApiValue::Num(v) => format!("{}", v),
            ApiValue::Str(s) => s.clone(),
        }
    }
}

/// A call of a host API function made from inside the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeCall {
    pub name: String,
    pub args: Vec<ApiValue>,
}

impl NativeCall {
    pub fn new(name: &str, args: Vec<ApiValue>) -> Self {
        Self {
            name: name.to_string(),
            args,
        }
    }
}

/// Receives what the interpreter produces while evaluating.
pub trait NativeSink {
    /// Text the interpreter printed.
    fn write_output(&mut self, text: &str);

    /// A forwarding shim was called; the return value goes back to R.
    fn native_call(&mut self, call: &NativeCall) -> ApiValue;

    /// The interpreter itself failed and cannot continue.
    fn fatal(&mut self, msg: &str) -> ! {
        log::error!("{}", fatal_message(msg));
        std::process::exit(1)
    }
}

/// An embeddable interpreter.
///
/// Implementations are driven from a single thread. `eval` is only called
/// between a successful `start` and the next `stop`.
pub trait Interpreter {
    /// Bring the runtime up with the given argument vector.
    fn start(&mut self, argv: &[String]) -> Result<()>;

    /// Shut the runtime down.
    fn stop(&mut self);

    /// Whether `start` may be called again after `stop`.
    fn can_restart(&self) -> bool {
        false
    }

    /// Evaluate `code` in the global environment, discarding its value.
    ///
    /// Errors raised by the code are reported as `Error::Eval`, an
    /// unrecoverable runtime failure as `Error::Fatal`.
    fn eval(&mut self, code: &str, sink: &mut dyn NativeSink) -> Result<()>;
}
