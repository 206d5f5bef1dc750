// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! Bridge calls: every piece of R source the adapter evaluates is built here.
//!
//! ```text
//! TIC-80 host            RScript               bridge              R
//! ┌──────────┐          ┌────────┐          ┌─────────┐        ┌─────────┐
//! │ tick()   │─────────►│ tick() │─────────►│ guarded │───────►│`TIC-80` │
//! │ boot()   │─────────►│ boot() │          │ call    │        │ BOOT    │
//! │ scn/bdr  │─────────►│ ...    │          └─────────┘        │ SCN ... │
//! └──────────┘          └────────┘                             └─────────┘
//! ```
//!
//! Entry points are called through a guard,
//! `` if (exists("f") && is.function(`f`)) `f`() ``, so a cart that does not
//! define a hook is never an error. Hook names are always backtick-quoted so
//! non-syntactic names such as `TIC-80` work; shim definitions only quote
//! names that need it.

use crate::syntax::is_syntactic_name;
use std::fmt::Write;

/// Host lifecycle callbacks and the R function each one calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    Boot,
    Tick,
    Menu,
    Border,
    Scanline,
}

impl Callback {
    pub const ALL: [Callback; 5] = [
        Callback::Boot,
        Callback::Tick,
        Callback::Menu,
        Callback::Border,
        Callback::Scanline,
    ];

    /// Name of the user-defined R function.
    pub fn fn_name(self) -> &'static str {
        match self {
            Callback::Boot => "BOOT",
            Callback::Tick => "TIC-80",
            Callback::Menu => "MENU",
            Callback::Border => "BDR",
            Callback::Scanline => "SCN",
        }
    }

    /// Guarded, argument-less call of this callback.
    pub fn call(self) -> BridgeCall {
        BridgeCall::new(self.fn_name())
    }
}

/// Argument value rendered as an R literal.
#[derive(Debug, Clone, PartialEq)]
pub enum RValue {
    Null,
    Bool(bool),
    Int(i32),
    Num(f64),
    Str(String),
}

impl RValue {
    pub fn to_r(&self) -> String {
        match self {
            RValue::Null => "NULL".to_string(),
            RValue::Bool(true) => "TRUE".to_string(),
            RValue::Bool(false) => "FALSE".to_string(),
            // NA_integer_ is i32::MIN in R
            RValue::Int(i32::MIN) => "NA_integer_".to_string(),
            RValue::Int(v) => format!("{}L", v),
            RValue::Num(v) if v.is_nan() => "NaN".to_string(),
            RValue::Num(v) if v.is_infinite() => {
                (if *v > 0.0 { "Inf" } else { "-Inf" }).to_string()
            }
            RValue::Num(v) => format!("{:?}", v),
            RValue::Str(s) => quote_str(s),
        }
    }
}

impl From<i32> for RValue {
    fn from(v: i32) -> Self {
        RValue::Int(v)
    }
}

impl From<f64> for RValue {
    fn from(v: f64) -> Self {
        RValue::Num(v)
    }
}

impl From<bool> for RValue {
    fn from(v: bool) -> Self {
        RValue::Bool(v)
    }
}

impl From<&str> for RValue {
    fn from(v: &str) -> Self {
        RValue::Str(v.to_string())
    }
}

/// Double-quoted R string literal.
pub fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => {}
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Backtick-quoted R symbol.
pub fn quote_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('`');
    for c in name.chars() {
        match c {
            '`' => out.push_str("\\`"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('`');
    out
}

/// `name` as it is written on the left of an assignment: bare when
/// syntactic, backtick-quoted otherwise.
pub fn symbol(name: &str) -> String {
    if is_syntactic_name(name) {
        name.to_string()
    } else {
        quote_name(name)
    }
}

/// A call of a named R function that only happens when it is defined.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeCall {
    pub name: String,
    pub args: Vec<RValue>,
}

impl BridgeCall {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: vec![],
        }
    }

    pub fn arg(mut self, v: impl Into<RValue>) -> Self {
        self.args.push(v.into());
        self
    }

    pub fn to_r(&self) -> String {
        let sym = quote_name(&self.name);
        let args = self
            .args
            .iter()
            .map(RValue::to_r)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "if (exists({}) && is.function({})) {}({})",
            quote_str(&self.name),
            sym,
            sym,
            args
        )
    }
}

/// Name of the native routine every forwarding shim calls.
pub const NATIVE_ENTRY: &str = "tic_api";

/// Definition of an R function named `keyword` that forwards its arguments
/// to the host through the native entry point.
pub fn forward_shim(keyword: &str) -> String {
    format!(
        "{} <- function(...) .Call({}, {}, list(...))",
        symbol(keyword),
        quote_str(NATIVE_ENTRY),
        quote_str(keyword)
    )
}

/// Defines `BOOT` as a no-op unless the cart already defined it.
pub fn boot_fallback() -> String {
    let name = Callback::Boot.fn_name();
    format!(
        "if (!(exists({}) && is.function({}))) {} <- function() NULL",
        quote_str(name),
        quote_name(name),
        quote_name(name)
    )
}

/// Removes every binding in the global environment.
pub fn clear_globals() -> &'static str {
    "rm(list = ls(envir = globalenv(), all.names = TRUE), envir = globalenv())"
}
