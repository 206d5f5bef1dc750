use std::ptr;
use tic_r::{
    bridge, ApiValue, Callback, Host, NativeCall, RScript, Reaction, RecordingInterpreter,
};

#[derive(Default)]
struct Studio {
    console: Vec<(String, u8)>,
    api: Vec<String>,
}

impl Host for Studio {
    fn trace(&mut self, text: &str, color: u8) {
        self.console.push((text.to_string(), color));
    }

    fn api_call(&mut self, call: &NativeCall) -> ApiValue {
        self.api.push(call.name.clone());
        match call.name.as_str() {
            "btn" => ApiValue::Bool(false),
            _ => ApiValue::Null,
        }
    }

    fn terminate(&mut self) -> ! {
        panic!("host terminated");
    }
}

const CART: &str = r#"
## title: hello
t <- 0
`TIC-80` <- function() {
  cls(13)
  spr(1 + t %% 60 %/% 30 * 2, 96, 24, 14, 3, 0, 0, 2, 2)
  t <<- t + 1
}
"#;

#[test]
fn test_cart_runs_frames() {
    let interp = RecordingInterpreter::new()
        .on("`TIC-80`()", Reaction::Native(NativeCall::new("cls", vec![ApiValue::Num(13.0)])))
        .on("`TIC-80`()", Reaction::Native(NativeCall::new("spr", vec![ApiValue::Num(1.0)])));
    let mut script = RScript::new(interp);
    let mut studio = Studio::default();

    assert!(script.init(&mut studio, CART));
    script.boot(&mut studio);
    for _ in 0..60 {
        script.tick(&mut studio);
        for row in 0..3 {
            script.scanline(&mut studio, row, ptr::null_mut());
            script.border(&mut studio, row, ptr::null_mut());
        }
    }

    assert_eq!(studio.api.len(), 120);
    assert!(studio.console.is_empty());

    let interp = script.interpreter();
    // every host api keyword got a shim
    for kw in studio.api_keywords() {
        assert_eq!(interp.evaluated_with(&bridge::forward_shim(kw)), 1, "{}", kw);
    }
    assert_eq!(interp.evaluated_with(&Callback::Tick.call().to_r()), 60);
    assert_eq!(interp.evaluated_with(&Callback::Scanline.call().to_r()), 180);
    assert_eq!(interp.evaluated_with(&Callback::Border.call().to_r()), 180);
    assert_eq!(interp.evaluated_with(&Callback::Boot.call().to_r()), 1);
}

#[test]
fn test_undefined_hooks_are_silent() {
    let mut script = RScript::new(RecordingInterpreter::new());
    let mut studio = Studio::default();
    assert!(script.init(&mut studio, "x <- 1"));

    script.tick(&mut studio);
    script.boot(&mut studio);
    script.menu(&mut studio, 0, ptr::null_mut());
    script.border(&mut studio, 0, ptr::null_mut());
    script.scanline(&mut studio, 0, ptr::null_mut());

    assert!(studio.console.is_empty());
    assert!(studio.api.is_empty());
}

#[test]
fn test_close_before_init() {
    let mut script = RScript::new(RecordingInterpreter::new());
    let mut studio = Studio::default();
    script.close(&mut studio);
    script.close(&mut studio);
    assert_eq!(script.interpreter().starts, 0);
    assert!(script.interpreter().evaluated.is_empty());
    assert!(studio.console.is_empty());
}

#[test]
fn test_console_eval_starts_once() {
    let interp = RecordingInterpreter::new()
        .on("trace(", Reaction::Native(NativeCall::new(
            "trace",
            vec![ApiValue::Str("hello".into()), ApiValue::Num(12.0)],
        )));
    let mut script = RScript::new(interp);
    let mut studio = Studio::default();

    script.eval(&mut studio, "v <- 1:10");
    script.eval(&mut studio, "trace(\"hello\", 12)");
    script.eval(&mut studio, "sum(v)");

    let interp = script.interpreter();
    assert_eq!(interp.starts, 1);
    assert_eq!(interp.evaluated_with("v <- 1:10"), 1);
    assert_eq!(interp.evaluated.last().map(String::as_str), Some("sum(v)"));
    assert_eq!(studio.console, vec![("hello".to_string(), 12)]);
}

#[test]
fn test_reload_cart() {
    let mut script = RScript::new(RecordingInterpreter::new());
    let mut studio = Studio::default();

    for round in 0..3 {
        let cart = format!("round <- {}", round);
        assert!(script.init(&mut studio, &cart));
        script.tick(&mut studio);
        script.close(&mut studio);
        assert_eq!(script.interpreter().evaluated_with(&cart), 1);
    }
    assert_eq!(script.interpreter().starts, 1);
    assert_eq!(script.interpreter().evaluated_with(bridge::clear_globals()), 3);
}

#[test]
#[should_panic(expected = "host terminated")]
fn test_fatal_error_terminates() {
    let interp = RecordingInterpreter::new().on("boom", Reaction::Fatal("memory exhausted".into()));
    let mut script = RScript::new(interp);
    let mut studio = Studio::default();
    script.init(&mut studio, "boom()");
}
