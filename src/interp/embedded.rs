// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! R embedded in the host process through libR-sys.
//!
//! R keeps its state in process globals and can be initialized only once per
//! process, so `EmbeddedR` is a thin handle over that global runtime. It is
//! neither `Send` nor restartable.
//!
//! On unix R's console and termination hooks are routed to the sink of the
//! running evaluation: stderr output and messages are traced, a fatal error
//! goes to `NativeSink::fatal`, and `quit()` raises an R error instead of
//! ending the host.

#![allow(unsafe_code)]

use super::{ApiValue, Interpreter, NativeCall, NativeSink};
use crate::error::{Error, Result};
#[cfg(unix)]
use crate::host::fatal_message;
use libR_sys::*;
use log::{debug, info};
#[cfg(unix)]
use log::{error, warn};
use std::{
    cell::Cell,
    ffi::{c_char, c_int, c_void, CStr, CString},
    marker::PhantomData,
    ptr,
    sync::atomic::{AtomicBool, Ordering},
};

static R_STARTED: AtomicBool = AtomicBool::new(false);

const SRC_VAR: &CStr = c".tic80_src";

// Evaluates the cart code held in `.tic80_src`. The value is
// list(<printed lines>, <error message or NULL>).
const EVAL_WRAPPER: &str = "local({ \
.tic80_err <- NULL; \
.tic80_out <- utils::capture.output(tryCatch(\
invisible(eval(parse(text = .tic80_src), envir = globalenv())), \
error = function(e) .tic80_err <<- conditionMessage(e))); \
list(.tic80_out, .tic80_err) })";

thread_local! {
    static SINK: Cell<Option<*mut (dyn NativeSink + 'static)>> = const { Cell::new(None) };
}

// Installs the sink for the duration of one evaluation.
struct SinkGuard<'a> {
    _sink: PhantomData<&'a mut dyn NativeSink>,
}

impl<'a> SinkGuard<'a> {
    fn install(sink: &'a mut dyn NativeSink) -> Self {
        let raw: *mut (dyn NativeSink + 'a) = sink;
        // The pointer is cleared in drop, before 'a ends.
        let raw: *mut (dyn NativeSink + 'static) = unsafe { std::mem::transmute(raw) };
        SINK.with(|s| s.set(Some(raw)));
        Self { _sink: PhantomData }
    }
}

impl Drop for SinkGuard<'_> {
    fn drop(&mut self) {
        SINK.with(|s| s.set(None));
    }
}

/// Handle to the process-wide embedded R runtime.
pub struct EmbeddedR {
    running: bool,
    _not_send: PhantomData<*mut ()>,
}

impl Default for EmbeddedR {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedR {
    pub fn new() -> Self {
        Self {
            running: false,
            _not_send: PhantomData,
        }
    }
}

impl Interpreter for EmbeddedR {
    fn start(&mut self, argv: &[String]) -> Result<()> {
        if R_STARTED.load(Ordering::Acquire) {
            self.running = true;
            return Ok(());
        }
        let args = argv
            .iter()
            .map(|a| CString::new(a.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Start {
                attempts: 1,
                reason: e.to_string(),
            })?;
        let mut raw: Vec<*mut c_char> = args.iter().map(|a| a.as_ptr() as *mut c_char).collect();

        if !unsafe { boot_r(&mut raw) } {
            return Err(Error::Start {
                attempts: 1,
                reason: "R failed to initialize".to_string(),
            });
        }
        register_natives();
        R_STARTED.store(true, Ordering::Release);
        self.running = true;
        info!("embedded R started with {:?}", argv);
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            unsafe { Rf_endEmbeddedR(0) };
            self.running = false;
            info!("embedded R stopped");
        }
    }

    fn eval(&mut self, code: &str, sink: &mut dyn NativeSink) -> Result<()> {
        if !self.running {
            return Err(Error::NotStarted);
        }
        let src = CString::new(code.replace('\0', ""))
            .map_err(|e| Error::Eval(e.to_string()))?;
        let wrapper = CString::new(EVAL_WRAPPER).map_err(|e| Error::Fatal(e.to_string()))?;

        let guard = SinkGuard::install(sink);
        let outcome = unsafe {
            Rf_defineVar(Rf_install(SRC_VAR.as_ptr()), Rf_mkString(src.as_ptr()), R_GlobalEnv);
            parse_and_eval(&wrapper)
        };
        drop(guard);

        let (lines, err) = outcome?;
        if !lines.is_empty() {
            let text = lines.join("\n");
            debug!("R output: {}", text);
            sink.write_output(&text);
        }
        match err {
            Some(msg) => Err(Error::Eval(format!("Error: {}", msg))),
            None => Ok(()),
        }
    }
}

// Rf_initEmbeddedR without the interactive flag, with R's console and
// termination hooks pointed at the adapter. The hooks are reset by
// Rf_initialize_R, so they go in between it and setup_Rmainloop.
#[cfg(unix)]
unsafe fn boot_r(args: &mut [*mut c_char]) -> bool {
    if Rf_initialize_R(args.len() as c_int, args.as_mut_ptr()) != 0 {
        return false;
    }
    R_Interactive = Rboolean::FALSE;
    R_CStackLimit = usize::MAX;
    R_Outputfile = ptr::null_mut();
    R_Consolefile = ptr::null_mut();
    ptr_R_WriteConsole = None;
    ptr_R_WriteConsoleEx = Some(write_console);
    ptr_R_ShowMessage = Some(show_message);
    ptr_R_Suicide = Some(suicide);
    ptr_R_CleanUp = Some(clean_up);
    setup_Rmainloop();
    true
}

#[cfg(not(unix))]
unsafe fn boot_r(args: &mut [*mut c_char]) -> bool {
    Rf_initEmbeddedR(args.len() as c_int, args.as_mut_ptr()) != 0
}

#[cfg(unix)]
unsafe fn c_text(p: *const c_char) -> String {
    if p.is_null() {
        return String::new();
    }
    CStr::from_ptr(p).to_string_lossy().into_owned()
}

// Console output that escaped capture.output: message(), warning() and
// anything R prints outside an evaluation.
#[cfg(unix)]
unsafe extern "C" fn write_console(buf: *const c_char, len: c_int, otype: c_int) {
    if buf.is_null() || len <= 0 {
        return;
    }
    let bytes = std::slice::from_raw_parts(buf as *const u8, len as usize);
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_end_matches('\n');
    if text.is_empty() {
        return;
    }
    if with_sink(|s| s.write_output(text)).is_none() {
        if otype == 0 {
            info!("R: {}", text);
        } else {
            warn!("R: {}", text);
        }
    }
}

#[cfg(unix)]
unsafe extern "C" fn show_message(msg: *const c_char) {
    let text = c_text(msg);
    if with_sink(|s| s.write_output(&text)).is_none() {
        warn!("R: {}", text);
    }
}

// R cannot go on. Outside an evaluation there is no host to tell.
#[cfg(unix)]
unsafe extern "C" fn suicide(msg: *const c_char) {
    let text = c_text(msg);
    if let Some(p) = SINK.with(|s| s.get()) {
        (*p).fatal(&text);
    }
    error!("{}", fatal_message(&text));
    std::process::exit(1);
}

// quit() from a cart must not take the host down; it becomes an R error
// caught by the evaluation that called it.
#[cfg(unix)]
unsafe extern "C" fn clean_up(_save: SA_TYPE, _status: c_int, _run_last: c_int) {
    Rf_error(c"%s".as_ptr(), c"quit() is not available inside TIC-80".as_ptr());
}

fn with_sink<T>(f: impl FnOnce(&mut dyn NativeSink) -> T) -> Option<T> {
    SINK.with(|s| s.get()).map(|p| unsafe { f(&mut *p) })
}

unsafe fn parse_and_eval(code: &CStr) -> Result<(Vec<String>, Option<String>)> {
    let text = Rf_protect(Rf_mkString(code.as_ptr()));
    let mut status = ParseStatus::PARSE_NULL;
    let exprs = Rf_protect(R_ParseVector(text, -1, &mut status, R_NilValue));
    if status != ParseStatus::PARSE_OK {
        Rf_unprotect(2);
        return Err(Error::Fatal(format!("adapter wrapper failed to parse ({:?})", status)));
    }

    let mut result = R_NilValue;
    for i in 0..Rf_xlength(exprs) {
        let mut err: c_int = 0;
        result = R_tryEval(VECTOR_ELT(exprs, i), R_GlobalEnv, &mut err);
        if err != 0 {
            Rf_unprotect(2);
            return Err(Error::Eval("evaluation aborted".to_string()));
        }
    }
    Rf_protect(result);
    let outcome = if TYPEOF(result) as u32 == VECSXP && Rf_xlength(result) == 2 {
        let err = strings_of(VECTOR_ELT(result, 1)).into_iter().next();
        (strings_of(VECTOR_ELT(result, 0)), err)
    } else {
        (strings_of(result), None)
    };
    Rf_unprotect(3);
    Ok(outcome)
}

unsafe fn strings_of(v: SEXP) -> Vec<String> {
    if Rf_isString(v) == Rboolean::FALSE {
        return vec![];
    }
    (0..Rf_xlength(v))
        .map(|i| {
            CStr::from_ptr(Rf_translateCharUTF8(STRING_ELT(v, i)))
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

unsafe fn api_value_of(v: SEXP) -> ApiValue {
    if Rf_xlength(v) == 0 {
        return ApiValue::Null;
    }
    match TYPEOF(v) as u32 {
        LGLSXP => ApiValue::Bool(Rf_asLogical(v) != 0),
        INTSXP | REALSXP => ApiValue::Num(Rf_asReal(v)),
        STRSXP => ApiValue::Str(strings_of(v).swap_remove(0)),
        _ => ApiValue::Null,
    }
}

unsafe fn sexp_of(v: &ApiValue) -> SEXP {
    match v {
        ApiValue::Null => R_NilValue,
        ApiValue::Bool(b) => Rf_ScalarLogical(c_int::from(*b)),
        ApiValue::Num(n) => Rf_ScalarReal(*n),
        ApiValue::Str(s) => match CString::new(s.as_str()) {
            Ok(c) => Rf_mkString(c.as_ptr()),
            Err(_) => R_NilValue,
        },
    }
}

// .Call("tic_api", name, list(...))
extern "C" fn tic_api(name: SEXP, args: SEXP) -> SEXP {
    unsafe {
        let name = strings_of(name).into_iter().next().unwrap_or_default();
        let args = (0..Rf_xlength(args))
            .map(|i| api_value_of(VECTOR_ELT(args, i)))
            .collect();
        let call = NativeCall { name, args };
        match with_sink(|s| s.native_call(&call)) {
            Some(v) => sexp_of(&v),
            None => R_NilValue,
        }
    }
}

fn register_natives() {
    let name = c"tic_api";
    let routines = Box::leak(Box::new([
        R_CallMethodDef {
            name: name.as_ptr(),
            fun: Some(unsafe {
                std::mem::transmute::<extern "C" fn(SEXP, SEXP) -> SEXP, unsafe extern "C" fn() -> *mut c_void>(
                    tic_api,
                )
            }),
            numArgs: 2,
        },
        R_CallMethodDef {
            name: ptr::null(),
            fun: None,
            numArgs: 0,
        },
    ]));
    unsafe {
        let dll = R_getEmbeddingDllInfo();
        R_registerRoutines(dll, ptr::null(), routines.as_ptr(), ptr::null(), ptr::null());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterConfig;
    use crate::env;

    #[derive(Default)]
    struct Collect {
        out: Vec<String>,
        calls: Vec<NativeCall>,
    }

    impl NativeSink for Collect {
        fn write_output(&mut self, text: &str) {
            self.out.push(text.to_string());
        }

        fn native_call(&mut self, call: &NativeCall) -> ApiValue {
            self.calls.push(call.clone());
            ApiValue::Num(1.0)
        }
    }

    // R can be started once per process and only from one thread, so the
    // whole runtime is checked in one test.
    #[test]
    fn test_embedded_runtime() {
        let cfg = AdapterConfig::default();
        env::ensure_defaults(&cfg.env);
        let mut r = EmbeddedR::new();
        assert!(matches!(r.eval("1", &mut Collect::default()), Err(Error::NotStarted)));
        r.start(&cfg.argv).unwrap();

        let mut sink = Collect::default();
        r.eval("print(1 + 1)", &mut sink).unwrap();
        assert_eq!(sink.out, vec!["[1] 2"]);

        // parse errors and runtime errors are both reported, after the output
        let mut sink = Collect::default();
        assert!(matches!(r.eval("x <- (", &mut sink), Err(Error::Eval(_))));
        let mut sink = Collect::default();
        match r.eval("cat('before\\n'); stop('bad cart')", &mut sink) {
            Err(Error::Eval(msg)) => assert_eq!(msg, "Error: bad cart"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(sink.out, vec!["before"]);

        // stderr output is traced too
        let mut sink = Collect::default();
        r.eval("message('hello from message')", &mut sink).unwrap();
        assert_eq!(sink.out, vec!["hello from message"]);

        // quit() is an error, not an exit
        let mut sink = Collect::default();
        assert!(matches!(r.eval("quit()", &mut sink), Err(Error::Eval(_))));

        let mut sink = Collect::default();
        r.eval(".Call(\"tic_api\", \"cls\", list(13))", &mut sink).unwrap();
        assert_eq!(sink.calls, vec![NativeCall::new("cls", vec![ApiValue::Num(13.0)])]);
    }
}
