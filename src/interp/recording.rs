// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

use super::{ApiValue, Interpreter, NativeCall, NativeSink};
use crate::error::{Error, Result};
use log::debug;

/// What a `RecordingInterpreter` does when it sees a piece of code.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    /// Print text.
    Output(String),
    /// Call back into the host.
    Native(NativeCall),
    /// Raise an R error.
    Error(String),
    /// Die.
    Fatal(String),
}

/// Interpreter that runs nothing and remembers everything.
///
/// Each `eval` is recorded. Reactions registered with [`on`](Self::on) fire
/// when the evaluated code contains their pattern, in registration order;
/// an `Error` or `Fatal` reaction ends the evaluation.
#[derive(Debug, Default)]
pub struct RecordingInterpreter {
    pub starts: u32,
    pub stops: u32,
    /// Number of leading `start` calls that fail.
    pub start_failures: u32,
    pub restartable: bool,
    pub running: bool,
    pub argv: Vec<String>,
    pub evaluated: Vec<String>,
    /// Values returned by the host for native calls, in call order.
    pub native_results: Vec<ApiValue>,
    reactions: Vec<(String, Reaction)>,
}

impl RecordingInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_starts(mut self, n: u32) -> Self {
        self.start_failures = n;
        self
    }

    pub fn restartable(mut self) -> Self {
        self.restartable = true;
        self
    }

    pub fn on(mut self, pattern: &str, reaction: Reaction) -> Self {
        self.reactions.push((pattern.to_string(), reaction));
        self
    }

    /// Evaluated snippets containing `pattern`.
    pub fn evaluated_with(&self, pattern: &str) -> usize {
        self.evaluated.iter().filter(|c| c.contains(pattern)).count()
    }
}

impl Interpreter for RecordingInterpreter {
    fn start(&mut self, argv: &[String]) -> Result<()> {
        self.starts += 1;
        if self.starts <= self.start_failures {
            return Err(Error::Start {
                attempts: self.starts,
                reason: "recording interpreter told to fail".to_string(),
            });
        }
        self.argv = argv.to_vec();
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.running = false;
    }

    fn can_restart(&self) -> bool {
        self.restartable
    }

    fn eval(&mut self, code: &str, sink: &mut dyn NativeSink) -> Result<()> {
        if !self.running {
            return Err(Error::NotStarted);
        }
        debug!("recording eval: {}", code);
        self.evaluated.push(code.to_string());

        for (pattern, reaction) in &self.reactions {
            if !code.contains(pattern.as_str()) {
                continue;
            }
            match reaction {
                Reaction::Output(text) => sink.write_output(text),
                Reaction::Native(call) => {
                    let v = sink.native_call(call);
                    self.native_results.push(v);
                }
                Reaction::Error(msg) => return Err(Error::Eval(msg.clone())),
                Reaction::Fatal(msg) => return Err(Error::Fatal(msg.clone())),
            }
        }
        Ok(())
    }
}
