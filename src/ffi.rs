// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! C entry points for linking the adapter into the TIC-80 host.
//!
//! The host passes a `TicRHost` with its callbacks on every call. One
//! `RScript<EmbeddedR>` lives per thread; TIC-80 drives it from its main loop.
//!
//! API functions reach the host through `api_call`, with arguments and the
//! result as `TicRValue`s. A string result only has to stay valid until
//! `api_call` returns. Without `api_call` only `trace` is defined in R.

// We have a lot of c-types in here, stop warning about their names!
#![allow(non_camel_case_types)]
#![allow(unsafe_code)]

use crate::config::AdapterConfig;
use crate::host::Host;
use crate::interp::{ApiValue, EmbeddedR, NativeCall};
use crate::script::RScript;
use crate::syntax::TIC_API_FUNCTIONS;
use log::{debug, warn};
use std::{
    cell::RefCell,
    ffi::{c_char, c_void, CStr, CString},
};

pub type tic_trace_fn = extern "C" fn(user: *mut c_void, text: *const c_char, color: u8);

pub type tic_api_fn = extern "C" fn(
    user: *mut c_void,
    name: *const c_char,
    args: *const TicRValue,
    argc: i32,
    out: *mut TicRValue,
);

pub const TIC_R_NULL: u8 = 0;
pub const TIC_R_BOOL: u8 = 1;
pub const TIC_R_NUM: u8 = 2;
pub const TIC_R_STR: u8 = 3;

/// A value crossing the API boundary. `num` holds booleans as 0/1.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct TicRValue {
    pub kind: u8,
    pub num: f64,
    pub str: *const c_char,
}

impl TicRValue {
    const NULL: TicRValue = TicRValue {
        kind: TIC_R_NULL,
        num: 0.0,
        str: std::ptr::null(),
    };
}

#[repr(C)]
pub struct TicRHost {
    pub user: *mut c_void,
    pub trace: tic_trace_fn,
    pub api_call: Option<tic_api_fn>,
    /// Names that get a forwarding function; NULL means every TIC-80 API function.
    pub api_keywords: *const *const c_char,
    pub api_keywords_count: i32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct TicROutlineItem {
    pub pos: *const c_char,
    pub size: i32,
}

struct CHost<'a> {
    host: &'a TicRHost,
    keywords: Vec<&'a str>,
}

impl<'a> CHost<'a> {
    fn new(host: &'a TicRHost) -> Self {
        let keywords = if host.api_call.is_none() {
            vec!["trace"]
        } else if host.api_keywords.is_null() || host.api_keywords_count <= 0 {
            TIC_API_FUNCTIONS.to_vec()
        } else {
            (0..host.api_keywords_count as usize)
                .filter_map(|i| c_str(unsafe { *host.api_keywords.add(i) }))
                .collect()
        };
        Self { host, keywords }
    }
}

// interior NULs would cut the text short on the C side
fn c_string(text: &str) -> CString {
    CString::new(text.replace('\0', "")).unwrap_or_default()
}

fn to_c(v: &ApiValue, text: Option<&CString>) -> TicRValue {
    match v {
        ApiValue::Null => TicRValue::NULL,
        ApiValue::Bool(b) => TicRValue {
            kind: TIC_R_BOOL,
            num: if *b { 1.0 } else { 0.0 },
            ..TicRValue::NULL
        },
        ApiValue::Num(n) => TicRValue {
            kind: TIC_R_NUM,
            num: *n,
            ..TicRValue::NULL
        },
        ApiValue::Str(_) => TicRValue {
            kind: TIC_R_STR,
            str: text.map_or(std::ptr::null(), |c| c.as_ptr()),
            ..TicRValue::NULL
        },
    }
}

fn from_c(v: &TicRValue) -> ApiValue {
    match v.kind {
        TIC_R_BOOL => ApiValue::Bool(v.num != 0.0),
        TIC_R_NUM => ApiValue::Num(v.num),
        TIC_R_STR => c_str(v.str).map_or(ApiValue::Null, |s| ApiValue::Str(s.to_string())),
        _ => ApiValue::Null,
    }
}

impl Host for CHost<'_> {
    fn trace(&mut self, text: &str, color: u8) {
        let text = c_string(text);
        (self.host.trace)(self.host.user, text.as_ptr(), color);
    }

    fn api_keywords(&self) -> &[&str] {
        &self.keywords
    }

    fn api_call(&mut self, call: &NativeCall) -> ApiValue {
        let Some(api) = self.host.api_call else {
            debug!("no api_call, {} dropped", call.name);
            return ApiValue::Null;
        };
        let name = c_string(&call.name);
        let texts: Vec<Option<CString>> = call
            .args
            .iter()
            .map(|v| v.as_str().map(c_string))
            .collect();
        let args: Vec<TicRValue> = call
            .args
            .iter()
            .zip(&texts)
            .map(|(v, t)| to_c(v, t.as_ref()))
            .collect();
        let mut out = TicRValue::NULL;
        api(self.host.user, name.as_ptr(), args.as_ptr(), args.len() as i32, &mut out);
        from_c(&out)
    }
}

thread_local! {
    static SCRIPT: RefCell<RScript<EmbeddedR>> = RefCell::new(RScript::new(EmbeddedR::new()));
    static OUTLINE: RefCell<Vec<TicROutlineItem>> = const { RefCell::new(Vec::new()) };
}

fn with_script(host: *const TicRHost, f: impl FnOnce(&mut RScript<EmbeddedR>, &mut CHost<'_>)) {
    if host.is_null() {
        return;
    }
    let mut h = CHost::new(unsafe { &*host });
    SCRIPT.with(|s| f(&mut s.borrow_mut(), &mut h));
}

fn c_str<'a>(p: *const c_char) -> Option<&'a str> {
    if p.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(p) }.to_str().ok()
}

/// Replace the adapter configuration from a TOML file. Must be called before
/// the first init to affect startup.
#[no_mangle]
pub extern "C" fn tic_r_configure(path: *const c_char) -> bool {
    let Some(path) = c_str(path) else {
        return false;
    };
    match AdapterConfig::load(path) {
        Ok(cfg) => {
            SCRIPT.with(|s| *s.borrow_mut() = RScript::with_config(EmbeddedR::new(), cfg));
            true
        }
        Err(e) => {
            warn!("tic_r_configure: {}", e);
            false
        }
    }
}

#[no_mangle]
pub extern "C" fn tic_r_init(host: *const TicRHost, code: *const c_char) -> bool {
    let code = c_str(code).unwrap_or("");
    let mut ok = false;
    with_script(host, |s, h| ok = s.init(h, code));
    ok
}

#[no_mangle]
pub extern "C" fn tic_r_close(host: *const TicRHost) {
    with_script(host, |s, h| s.close(h));
}

#[no_mangle]
pub extern "C" fn tic_r_tick(host: *const TicRHost) {
    with_script(host, |s, h| s.tick(h));
}

#[no_mangle]
pub extern "C" fn tic_r_boot(host: *const TicRHost) {
    with_script(host, |s, h| s.boot(h));
}

#[no_mangle]
pub extern "C" fn tic_r_menu(host: *const TicRHost, index: i32, data: *mut c_void) {
    with_script(host, |s, h| s.menu(h, index, data));
}

#[no_mangle]
pub extern "C" fn tic_r_border(host: *const TicRHost, row: i32, data: *mut c_void) {
    with_script(host, |s, h| s.border(h, row, data));
}

#[no_mangle]
pub extern "C" fn tic_r_scanline(host: *const TicRHost, row: i32, data: *mut c_void) {
    with_script(host, |s, h| s.scanline(h, row, data));
}

#[no_mangle]
pub extern "C" fn tic_r_eval(host: *const TicRHost, code: *const c_char) {
    if let Some(code) = c_str(code) {
        with_script(host, |s, h| s.eval(h, code));
    }
}

/// Outline of `code`. The returned array stays valid until the next call on
/// this thread; `size` receives its length.
#[no_mangle]
pub extern "C" fn tic_r_outline(code: *const c_char, size: *mut i32) -> *const TicROutlineItem {
    if size.is_null() {
        return std::ptr::null();
    }
    unsafe { *size = 0 };
    let Some(text) = c_str(code) else {
        return std::ptr::null();
    };
    SCRIPT.with(|s| {
        let mut s = s.borrow_mut();
        let Ok(items) = s.outline(text) else {
            return std::ptr::null();
        };
        OUTLINE.with(|out| {
            let mut out = out.borrow_mut();
            out.clear();
            out.extend(items.iter().map(|it| TicROutlineItem {
                pos: unsafe { code.add(it.pos) },
                size: it.size as i32,
            }));
            unsafe { *size = out.len() as i32 };
            out.as_ptr()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[derive(Default)]
    struct Tic {
        lines: Vec<(String, u8)>,
        calls: Vec<(String, Vec<ApiValue>)>,
    }

    extern "C" fn tic_trace(user: *mut c_void, text: *const c_char, color: u8) {
        let tic = unsafe { &mut *(user as *mut Tic) };
        let text = unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned();
        tic.lines.push((text, color));
    }

    extern "C" fn tic_api(
        user: *mut c_void,
        name: *const c_char,
        args: *const TicRValue,
        argc: i32,
        out: *mut TicRValue,
    ) {
        let tic = unsafe { &mut *(user as *mut Tic) };
        let name = unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned();
        let args = unsafe { std::slice::from_raw_parts(args, argc as usize) };
        tic.calls.push((name.clone(), args.iter().map(from_c).collect()));
        if name == "btn" {
            unsafe {
                *out = TicRValue {
                    kind: TIC_R_BOOL,
                    num: 1.0,
                    str: ptr::null(),
                }
            };
        }
    }

    fn host(tic: &mut Tic, api: Option<tic_api_fn>, keywords: &[*const c_char]) -> TicRHost {
        TicRHost {
            user: tic as *mut Tic as *mut c_void,
            trace: tic_trace,
            api_call: api,
            api_keywords: if keywords.is_empty() { ptr::null() } else { keywords.as_ptr() },
            api_keywords_count: keywords.len() as i32,
        }
    }

    #[test]
    fn test_api_calls_reach_host() {
        let mut tic = Tic::default();
        let raw = host(&mut tic, Some(tic_api), &[]);
        let mut h = CHost::new(&raw);
        assert_eq!(h.api_keywords(), TIC_API_FUNCTIONS);

        let v = h.api_call(&NativeCall::new("btn", vec![ApiValue::Num(0.0)]));
        assert_eq!(v, ApiValue::Bool(true));
        let v = h.api_call(&NativeCall::new(
            "print",
            vec![ApiValue::Str("HELLO".into()), ApiValue::Num(84.0), ApiValue::Bool(false)],
        ));
        assert_eq!(v, ApiValue::Null);
        h.trace("a\0b", 15);

        assert_eq!(tic.calls, vec![
            ("btn".to_string(), vec![ApiValue::Num(0.0)]),
            ("print".to_string(), vec![
                ApiValue::Str("HELLO".into()),
                ApiValue::Num(84.0),
                ApiValue::Bool(false),
            ]),
        ]);
        assert_eq!(tic.lines, vec![("ab".to_string(), 15)]);
    }

    #[test]
    fn test_keywords_from_host() {
        let mut tic = Tic::default();
        let names = [c"cls".as_ptr(), c"spr".as_ptr()];
        let raw = host(&mut tic, Some(tic_api), &names);
        assert_eq!(CHost::new(&raw).api_keywords(), &["cls", "spr"]);

        // nothing to forward to: only trace is defined
        let raw = host(&mut tic, None, &names);
        let mut h = CHost::new(&raw);
        assert_eq!(h.api_keywords(), &["trace"]);
        assert_eq!(h.api_call(&NativeCall::new("cls", vec![])), ApiValue::Null);
    }
}
