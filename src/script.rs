// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! RScript - the R adapter the TIC-80 host drives.
//!
//! ```text
//! TIC-80 host              RScript                   R
//! ┌─────────────┐         ┌───────────┐          ┌─────────────┐
//! │ init(code)  │────────►│ start     │─────────►│ embedded R  │
//! │             │         │ shims     │─────────►│ cls, spr .. │
//! │             │         │ cart code │─────────►│ user fns    │
//! │ tick()      │────────►│ guarded   │─────────►│ `TIC-80`()  │
//! │ scn/bdr/menu│────────►│ calls     │─────────►│ SCN() ..    │
//! │ eval(code)  │────────►│ eval      │─────────►│             │
//! │ trace()     │◄────────│ HostSink  │◄─────────│ print/trace │
//! │ close()     │────────►│ detach    │          │             │
//! └─────────────┘         └───────────┘          └─────────────┘
//! ```
//!
//! # Lifecycle
//!
//! - `init` starts R once, defines a forwarding function for every host API
//!   keyword, loads the cart and defines a no-op `BOOT` if the cart has none.
//!   A session still attached from a previous cart is reset first.
//! - `tick`, `boot`, `menu`, `border`, `scanline` call the cart's `TIC-80`,
//!   `BOOT`, `MENU`, `BDR` and `SCN` when they are defined, and do nothing
//!   otherwise. The row/index and data arguments the host passes are not
//!   forwarded to R.
//! - `close` detaches the session. R cannot be restarted inside a process,
//!   so instead of shutting it down the global environment is cleared; the
//!   next `init` reuses the running interpreter.
//! - `eval` runs console input, starting R first if it is not running and
//!   can be started.
//!
//! Output printed by R, and errors raised by the cart, are shown with the
//! host's `trace` in color 15. A fatal interpreter error ends the process.

use crate::bridge::{self, BridgeCall, Callback};
use crate::config::AdapterConfig;
use crate::env;
use crate::error::{Error, Result};
use crate::host::{fatal, Host, HostSink};
use crate::interp::Interpreter;
use crate::outline::{OutlineItem, Outliner};
use crate::session::{RuntimeState, Session};
use log::{debug, error, info, trace};
use std::ffi::c_void;

pub struct RScript<I: Interpreter> {
    session: Session<I>,
    config: AdapterConfig,
    outliner: Outliner,
}

impl<I: Interpreter> RScript<I> {
    pub fn new(interp: I) -> Self {
        Self::with_config(interp, AdapterConfig::default())
    }

    pub fn with_config(interp: I, config: AdapterConfig) -> Self {
        Self {
            session: Session::new(interp),
            config,
            outliner: Outliner::new(),
        }
    }

    /// Start R if needed and load `code`. Returns false when R could not be
    /// started or the cart failed to load; the reason has been traced.
    pub fn init<H: Host + ?Sized>(&mut self, host: &mut H, code: &str) -> bool {
        match self.try_init(host, code) {
            Ok(()) => {
                info!("cart loaded ({} bytes)", code.len());
                true
            }
            Err(Error::Fatal(msg)) => fatal(host, &msg),
            Err(e) => {
                error!("init failed: {}", e);
                host.trace(&e.to_string(), self.config.trace_color);
                false
            }
        }
    }

    fn try_init<H: Host + ?Sized>(&mut self, host: &mut H, code: &str) -> Result<()> {
        env::ensure_defaults(&self.config.env);
        if self.session.is_attached() {
            // a new cart never sees the previous one's bindings
            debug!("init over a live session, resetting it first");
            self.reset(host)?;
        }
        if self
            .session
            .start(&self.config.argv, self.config.max_start_attempts)?
        {
            info!("R started: {:?}", self.config.argv);
        }

        let keywords: Vec<String> = host.api_keywords().iter().map(|k| k.to_string()).collect();
        for keyword in &keywords {
            self.run(host, &bridge::forward_shim(keyword))?;
        }
        debug!("{} forwarding shims defined", keywords.len());

        self.eval_raw(host, code)?;
        self.run(host, &bridge::boot_fallback())
    }

    /// Detach from the host. Safe to call at any time.
    pub fn close<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.session.is_attached() {
            debug!("close: no active session");
            return;
        }
        if let Err(e) = self.reset(host) {
            self.report(host, e);
        }
    }

    // Stops a restartable interpreter; otherwise clears the globals and
    // detaches, leaving R running for the next init.
    fn reset<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if self.session.interpreter().can_restart() {
            self.session.stop();
            return Ok(());
        }
        let cleared = self.run(host, bridge::clear_globals());
        self.session.detach();
        info!("session detached");
        cleared
    }

    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.call(host, Callback::Tick.call());
    }

    pub fn boot<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.call(host, Callback::Boot.call());
    }

    pub fn menu<H: Host + ?Sized>(&mut self, host: &mut H, index: i32, data: *mut c_void) {
        trace!("MENU index={} data={:p}", index, data);
        self.call(host, Callback::Menu.call());
    }

    pub fn border<H: Host + ?Sized>(&mut self, host: &mut H, row: i32, data: *mut c_void) {
        trace!("BDR row={} data={:p}", row, data);
        self.call(host, Callback::Border.call());
    }

    pub fn scanline<H: Host + ?Sized>(&mut self, host: &mut H, row: i32, data: *mut c_void) {
        trace!("SCN row={} data={:p}", row, data);
        self.call(host, Callback::Scanline.call());
    }

    /// Console evaluation. The value is discarded; output goes to `trace`.
    pub fn eval<H: Host + ?Sized>(&mut self, host: &mut H, code: &str) {
        env::ensure_defaults(&self.config.env);
        if self.needs_start() {
            // lazy start loads `code` as the cart
            self.init(host, code);
            return;
        }
        if let Err(e) = self.run(host, code) {
            self.report(host, e);
        }
    }

    // Never started, or shut down by a close and able to come back.
    fn needs_start(&self) -> bool {
        match self.session.state() {
            RuntimeState::NotStarted => true,
            RuntimeState::ShutDown => self.session.interpreter().can_restart(),
            RuntimeState::Running => false,
        }
    }

    /// Forward outline of `code`, valid until the next call.
    pub fn outline(&mut self, code: &str) -> Result<&[OutlineItem]> {
        self.outliner.scan(code)
    }

    /// Calls a cart function by name if it is defined, through the same
    /// path as the lifecycle hooks.
    pub fn invoke<H: Host + ?Sized>(&mut self, host: &mut H, call: BridgeCall) {
        self.call(host, call);
    }

    fn call<H: Host + ?Sized>(&mut self, host: &mut H, call: BridgeCall) {
        if !self.session.is_active() {
            trace!("{} skipped, no active session", call.name);
            return;
        }
        if let Err(e) = self.run(host, &call.to_r()) {
            self.report(host, e);
        }
    }

    fn eval_raw<H: Host + ?Sized>(&mut self, host: &mut H, code: &str) -> Result<()> {
        let mut sink = HostSink::new(host, self.config.trace_color);
        self.session.eval(code, &mut sink)
    }

    // Cart errors are shown, not returned.
    fn run<H: Host + ?Sized>(&mut self, host: &mut H, code: &str) -> Result<()> {
        match self.eval_raw(host, code) {
            Err(Error::Eval(msg)) => {
                debug!("R error: {}", msg);
                host.trace(&msg, self.config.trace_color);
                Ok(())
            }
            other => other,
        }
    }

    fn report<H: Host + ?Sized>(&mut self, host: &mut H, e: Error) {
        match e {
            Error::Fatal(msg) => fatal(host, &msg),
            e => {
                error!("{}", e);
                host.trace(&e.to_string(), self.config.trace_color);
            }
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn session(&self) -> &Session<I> {
        &self.session
    }

    pub fn interpreter(&self) -> &I {
        self.session.interpreter()
    }

    pub fn interpreter_mut(&mut self) -> &mut I {
        self.session.interpreter_mut()
    }
}
