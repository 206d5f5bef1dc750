// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! Function outline for the code editor.
//!
//! The editor asks for a list of spans to show in its outline panel. A span
//! is reported for every `<- function(` in the cart. Two extractors exist:
//!
//! - [`Outliner::scan`] is what TIC-80 carts have always seen: the span is
//!   the identifier run right *after* `function(`, so for
//!   `f <- function(x, y)` it covers `x`.
//! - [`Outliner::scan_assigned`] reports the name being assigned (`f`).
//!
//! Results borrow the outliner's buffer, which is cleared on every call.

use crate::error::{Error, Result};
use crate::syntax::is_ident_char;

const FUNC_PATTERN: &str = "<- function(";

/// Byte span of one outline entry inside the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutlineItem {
    pub pos: usize,
    pub size: usize,
}

impl OutlineItem {
    /// The text this item covers in `code`, which must be the scanned source.
    pub fn text<'a>(&self, code: &'a str) -> &'a str {
        code.get(self.pos..self.pos + self.size).unwrap_or("")
    }
}

/// Reusable outline result buffer.
#[derive(Debug, Default)]
pub struct Outliner {
    items: Vec<OutlineItem>,
}

impl Outliner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, item: OutlineItem) -> Result<()> {
        self.items.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        self.items.push(item);
        Ok(())
    }

    /// Forward-scanning outline, one entry per `<- function(` whose
    /// following identifier run is non-empty and terminated before the end
    /// of the source.
    pub fn scan(&mut self, code: &str) -> Result<&[OutlineItem]> {
        self.items.clear();
        let bytes = code.as_bytes();
        let mut from = 0;

        while let Some(off) = code[from..].find(FUNC_PATTERN) {
            let start = from + off + FUNC_PATTERN.len();
            let mut ptr = start;
            let mut end = start;
            while ptr < bytes.len() {
                if !is_ident_char(bytes[ptr]) {
                    end = ptr;
                    break;
                }
                ptr += 1;
            }
            if end > start {
                self.push(OutlineItem {
                    pos: start,
                    size: end - start,
                })?;
            }
            from = ptr;
        }

        Ok(&self.items)
    }

    /// Outline of assigned names: `name <- function(`, `name<<- function(`
    /// and `` `odd name` <- function( `` each report the name.
    pub fn scan_assigned(&mut self, code: &str) -> Result<&[OutlineItem]> {
        self.items.clear();
        let bytes = code.as_bytes();

        for (m, _) in code.match_indices(FUNC_PATTERN) {
            let mut i = m;
            if i > 0 && bytes[i - 1] == b'<' {
                i -= 1;
            }
            while i > 0 && matches!(bytes[i - 1], b' ' | b'\t') {
                i -= 1;
            }
            if let Some(item) = assigned_name_before(bytes, i) {
                self.push(item)?;
            }
        }

        Ok(&self.items)
    }

    /// Items of the last scan.
    pub fn items(&self) -> &[OutlineItem] {
        &self.items
    }
}

// `end` is one past the last byte of the candidate name.
fn assigned_name_before(bytes: &[u8], end: usize) -> Option<OutlineItem> {
    if end == 0 {
        return None;
    }
    if bytes[end - 1] == b'`' {
        let close = end - 1;
        let open = bytes[..close].iter().rposition(|&c| c == b'`' || c == b'\n')?;
        if bytes[open] != b'`' || open + 1 == close {
            return None;
        }
        return Some(OutlineItem {
            pos: open + 1,
            size: close - open - 1,
        });
    }
    let mut start = end;
    while start > 0 && is_ident_char(bytes[start - 1]) {
        start -= 1;
    }
    (end > start).then_some(OutlineItem {
        pos: start,
        size: end - start,
    })
}

/// One-shot forward outline with owned results.
pub fn outline(code: &str) -> Result<Vec<OutlineItem>> {
    let mut outliner = Outliner::new();
    Ok(outliner.scan(code)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(code: &'a str, items: &[OutlineItem]) -> Vec<&'a str> {
        items.iter().map(|it| it.text(code)).collect()
    }

    #[test]
    fn test_no_functions() {
        let mut o = Outliner::new();
        assert!(o.scan("x <- 1\ny <- x + 2\n").unwrap().is_empty());
        assert!(o.scan("").unwrap().is_empty());
    }

    #[test]
    fn test_forward_scan_captures_first_arg() {
        let code = "f <- function(x, y) x+y";
        let mut o = Outliner::new();
        let items = o.scan(code).unwrap();
        assert_eq!(items, &[OutlineItem { pos: 14, size: 1 }]);
        assert_eq!(items[0].text(code), "x");
    }

    #[test]
    fn test_forward_scan_skips_empty_and_unterminated() {
        let mut o = Outliner::new();
        // empty argument list gives an empty run
        assert!(o.scan("BOOT <- function() NULL").unwrap().is_empty());
        // run reaching end of input is dropped
        assert!(o.scan("g <- function(abc").unwrap().is_empty());
    }

    #[test]
    fn test_source_order() {
        let code = "a <- function(one) 1\nb <- function(two.x, y) 2\nc <- function() 3\n";
        let mut o = Outliner::new();
        let items = o.scan(code).unwrap().to_vec();
        assert_eq!(texts(code, &items), vec!["one", "two.x"]);
        assert!(items[0].pos < items[1].pos);
    }

    #[test]
    fn test_buffer_reuse() {
        let mut o = Outliner::new();
        let first = "f <- function(alpha) 1\ng <- function(beta) 2";
        assert_eq!(o.scan(first).unwrap().len(), 2);

        let second = String::from("h <- function(z) z");
        let items = o.scan(&second).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text(&second), "z");
        assert_eq!(o.items().len(), 1);
    }

    #[test]
    fn test_scan_assigned() {
        let code = "f <- function(x, y) x+y\n`TIC-80` <- function() {}\ncounter<<- function(n) n\n";
        let mut o = Outliner::new();
        let items = o.scan_assigned(code).unwrap().to_vec();
        assert_eq!(texts(code, &items), vec!["f", "TIC-80", "counter"]);
    }

    #[test]
    fn test_scan_assigned_without_name() {
        let mut o = Outliner::new();
        assert!(o.scan_assigned("<- function(x) x").unwrap().is_empty());
        assert!(o.scan_assigned("(<- function(x) x)").unwrap().is_empty());
    }

    #[test]
    fn test_outline_owned() {
        let items = outline("sq <- function(n) n*n").unwrap();
        assert_eq!(items, vec![OutlineItem { pos: 15, size: 1 }]);
    }
}
