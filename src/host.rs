// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! What the adapter needs from the TIC-80 host, and the native side of the
//! R-to-host boundary.

use crate::interp::{ApiValue, NativeCall, NativeSink};
use crate::syntax::TIC_API_FUNCTIONS;
use log::{debug, error};

/// Color index used for every adapter-originated trace line.
pub const TRACE_COLOR: u8 = 15;

/// The host engine as seen by the R adapter.
pub trait Host {
    /// Show `text` in the console in palette color `color`.
    fn trace(&mut self, text: &str, color: u8);

    /// API names that get an R forwarding function at init.
    fn api_keywords(&self) -> &[&str] {
        TIC_API_FUNCTIONS
    }

    /// A cart called a host API function other than `trace`.
    fn api_call(&mut self, call: &NativeCall) -> ApiValue {
        debug!("unhandled api call {}({} args)", call.name, call.args.len());
        ApiValue::Null
    }

    /// End the process after a fatal interpreter error.
    fn terminate(&mut self) -> ! {
        std::process::exit(1)
    }
}

/// Fatal-error message in the form the console shows it.
pub fn fatal_message(msg: &str) -> String {
    format!("Fatal error, but can't kermit: {}\nExecute me, please.\n", msg)
}

/// The interpreter cannot continue: tell the user, then terminate.
pub fn fatal<H: Host + ?Sized>(host: &mut H, msg: &str) -> ! {
    error!("fatal interpreter error: {}", msg);
    host.trace(&fatal_message(msg), TRACE_COLOR);
    host.terminate()
}

/// The `trace` trampoline: first argument is the text, optional second the color.
pub fn native_trace<H: Host + ?Sized>(host: &mut H, call: &NativeCall, default_color: u8) -> ApiValue {
    let text = call.args.first().map(ApiValue::display).unwrap_or_default();
    let color = call
        .args
        .get(1)
        .and_then(ApiValue::as_num)
        .filter(|c| (0.0..=15.0).contains(c))
        .map_or(default_color, |c| c as u8);
    host.trace(&text, color);
    ApiValue::Null
}

/// Routes interpreter output and native calls of one evaluation to a host.
pub struct HostSink<'a, H: Host + ?Sized> {
    host: &'a mut H,
    color: u8,
}

impl<'a, H: Host + ?Sized> HostSink<'a, H> {
    pub fn new(host: &'a mut H, color: u8) -> Self {
        Self { host, color }
    }
}

impl<H: Host + ?Sized> NativeSink for HostSink<'_, H> {
    fn write_output(&mut self, text: &str) {
        self.host.trace(text, self.color);
    }

    fn native_call(&mut self, call: &NativeCall) -> ApiValue {
        match call.name.as_str() {
            "trace" => native_trace(&mut *self.host, call, self.color),
            _ => self.host.api_call(call),
        }
    }

    fn fatal(&mut self, msg: &str) -> ! {
        fatal(&mut *self.host, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Console {
        lines: Vec<(String, u8)>,
    }

    impl Host for Console {
        fn trace(&mut self, text: &str, color: u8) {
            self.lines.push((text.to_string(), color));
        }

        fn terminate(&mut self) -> ! {
            panic!("terminated: {:?}", self.lines);
        }
    }

    #[test]
    fn test_fatal_message() {
        assert_eq!(
            fatal_message("no R_HOME"),
            "Fatal error, but can't kermit: no R_HOME\nExecute me, please.\n"
        );
    }

    #[test]
    #[should_panic(expected = "Fatal error, but can't kermit: stack")]
    fn test_fatal_traces_then_terminates() {
        let mut c = Console::default();
        fatal(&mut c, "stack");
    }

    #[test]
    fn test_native_trace_colors() {
        let mut c = Console::default();
        let call = NativeCall::new("trace", vec![ApiValue::Str("hi".into())]);
        assert_eq!(native_trace(&mut c, &call, TRACE_COLOR), ApiValue::Null);

        let call = NativeCall::new("trace", vec![ApiValue::Num(42.0), ApiValue::Num(3.0)]);
        native_trace(&mut c, &call, TRACE_COLOR);

        let call = NativeCall::new("trace", vec![ApiValue::Str("x".into()), ApiValue::Num(99.0)]);
        native_trace(&mut c, &call, TRACE_COLOR);

        assert_eq!(
            c.lines,
            vec![("hi".to_string(), 15), ("42".to_string(), 3), ("x".to_string(), 15)]
        );
    }

    #[test]
    fn test_host_sink_routes() {
        let mut c = Console::default();
        {
            let mut sink = HostSink::new(&mut c, TRACE_COLOR);
            sink.write_output("[1] 2");
            let v = sink.native_call(&NativeCall::new("cls", vec![]));
            assert_eq!(v, ApiValue::Null);
        }
        assert_eq!(c.lines, vec![("[1] 2".to_string(), 15)]);
    }

    #[test]
    #[should_panic(expected = "kermit: R_HOME is not set\\nExecute me, please.\\n\", 15)")]
    fn test_host_sink_fatal() {
        let mut c = Console::default();
        // trace color of the evaluation does not apply to fatal errors
        let mut sink = HostSink::new(&mut c, 3);
        sink.fatal("R_HOME is not set");
    }
}
