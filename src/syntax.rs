// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! Lexical tables the host editor uses to highlight R carts.

/// Reserved words of R, including the `...` / `..N` argument forms (see `?dots`).
pub const R_KEYWORDS: &[&str] = &[
    "if", "else", "repeat", "while", "function", "for", "in", "next", "break",
    "TRUE", "FALSE", "NULL", "Inf", "NaN", "NA", "NA_integer_", "NA_real_",
    "NA_complex_", "NA_character_",
    "...", "..1", "..2", "..3", "..4", "..5", "..6", "..7", "..8", "..9",
];

/// Entry points the host calls back into, as the host names them.
pub const TIC_CALLBACKS: &[&str] = &["TIC", "SCN", "BDR", "MENU", "BOOT"];

/// TIC-80 API functions exposed to carts.
pub const TIC_API_FUNCTIONS: &[&str] = &[
    "print", "cls", "pix", "line", "rect", "rectb", "spr", "btn", "btnp", "sfx",
    "map", "mget", "mset", "peek", "poke", "peek1", "poke1", "peek2", "poke2",
    "peek4", "poke4", "memcpy", "memset", "trace", "pmem", "time", "tstamp",
    "exit", "font", "mouse", "circ", "circb", "elli", "ellib", "tri", "trib",
    "ttri", "clip", "music", "sync", "reset", "key", "keyp", "fget", "fset",
    "vbank", "paint",
];

/// Callbacks followed by API functions, the order the editor expects.
pub const API_KEYWORDS: &[&str] = &[
    "TIC", "SCN", "BDR", "MENU", "BOOT",
    "print", "cls", "pix", "line", "rect", "rectb", "spr", "btn", "btnp", "sfx",
    "map", "mget", "mset", "peek", "poke", "peek1", "poke1", "peek2", "poke2",
    "peek4", "poke4", "memcpy", "memset", "trace", "pmem", "time", "tstamp",
    "exit", "font", "mouse", "circ", "circb", "elli", "ellib", "tri", "trib",
    "ttri", "clip", "music", "sync", "reset", "key", "keyp", "fget", "fset",
    "vbank", "paint",
];

pub const SINGLE_COMMENT: &str = "##";
pub const PROJECT_COMMENT: &str = "##";
pub const STRING_DELIMITER: &str = "\"";

/// True for bytes that may continue an R identifier: ASCII letters, digits, `_` and `.`.
pub fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'.'
}

/// True when `name` can be written without backticks in R source.
///
/// Syntactic names start with a letter, or a dot not followed by a digit, and
/// are not reserved words.
pub fn is_syntactic_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    let Some(&first) = bytes.first() else {
        return false;
    };
    let starts_ok = match first {
        b'.' => !bytes.get(1).is_some_and(u8::is_ascii_digit),
        c => c.is_ascii_alphabetic(),
    };
    starts_ok && bytes.iter().all(|&c| is_ident_char(c)) && !R_KEYWORDS.contains(&name)
}
