// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! Owned interpreter session.
//!
//! Two things are tracked separately:
//!
//! - the runtime: `NotStarted -> Running -> ShutDown`. Leaving `ShutDown`
//!   needs an interpreter that can restart; R cannot.
//! - attachment: whether a host currently owns the session (set by a
//!   successful start or `attach`, cleared by `detach` or `stop`).
//!
//! Hooks only run while the session is active, i.e. running and attached.

use crate::error::{Error, Result};
use crate::interp::{Interpreter, NativeSink};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    NotStarted,
    Running,
    ShutDown,
}

pub struct Session<I: Interpreter> {
    interp: I,
    state: RuntimeState,
    attached: bool,
}

impl<I: Interpreter> Session<I> {
    pub fn new(interp: I) -> Self {
        Self {
            interp,
            state: RuntimeState::NotStarted,
            attached: false,
        }
    }

    /// Start the runtime, trying at most `max_attempts` times.
    ///
    /// Returns `Ok(false)` when the runtime was already running, in which
    /// case the session is simply attached.
    pub fn start(&mut self, argv: &[String], max_attempts: u32) -> Result<bool> {
        match self.state {
            RuntimeState::Running => {
                self.attached = true;
                return Ok(false);
            }
            RuntimeState::ShutDown if !self.interp.can_restart() => {
                return Err(Error::RestartUnsupported);
            }
            _ => {}
        }

        let attempts = max_attempts.max(1);
        let mut reason = String::new();
        for attempt in 1..=attempts {
            match self.interp.start(argv) {
                Ok(()) => {
                    info!("interpreter started (attempt {}/{})", attempt, attempts);
                    self.state = RuntimeState::Running;
                    self.attached = true;
                    return Ok(true);
                }
                Err(e) => {
                    warn!("interpreter start attempt {}/{} failed: {}", attempt, attempts, e);
                    reason = e.to_string();
                }
            }
        }
        Err(Error::Start { attempts, reason })
    }

    /// Shut the runtime down. No-op unless running.
    pub fn stop(&mut self) {
        if self.state == RuntimeState::Running {
            self.interp.stop();
            self.state = RuntimeState::ShutDown;
            info!("interpreter shut down");
        }
        self.attached = false;
    }

    pub fn attach(&mut self) {
        self.attached = self.state == RuntimeState::Running;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_active(&self) -> bool {
        self.attached && self.state == RuntimeState::Running
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    /// True once the runtime has been started, even if shut down since.
    pub fn has_started(&self) -> bool {
        self.state != RuntimeState::NotStarted
    }

    pub fn eval(&mut self, code: &str, sink: &mut dyn NativeSink) -> Result<()> {
        if self.state != RuntimeState::Running {
            return Err(Error::NotStarted);
        }
        self.interp.eval(code, sink)
    }

    pub fn interpreter(&self) -> &I {
        &self.interp
    }

    pub fn interpreter_mut(&mut self) -> &mut I {
        &mut self.interp
    }
}
