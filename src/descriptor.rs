// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! The record the host registers R with: language slot, editor tables and
//! the bundled demo and benchmark cartridges.
//!
//! Lifecycle hooks are the methods of [`RScript`](crate::script::RScript);
//! the C entry points for them live in `ffi` (feature `embedded-r`).

use crate::error::Result;
use crate::outline::{outline, OutlineItem};
use crate::syntax::{
    is_ident_char, API_KEYWORDS, PROJECT_COMMENT, R_KEYWORDS, SINGLE_COMMENT, STRING_DELIMITER,
};

/// Language slot of R. Slots count up from 10 (Lua); Python took 20.
pub const R_SCRIPT_ID: u8 = 21;

static DEMO_ROM: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/rdemo.tic.dat"));
static MARK_ROM: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/rmark.tic.dat"));

/// A cartridge compiled into the adapter.
#[derive(Debug, Clone, Copy)]
pub struct RomBlob {
    pub data: &'static [u8],
    pub name: Option<&'static str>,
}

impl RomBlob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub struct ScriptDescriptor {
    pub id: u8,
    pub name: &'static str,
    pub file_extension: &'static str,
    pub project_comment: &'static str,

    pub block_comment_start: Option<&'static str>,
    pub block_comment_end: Option<&'static str>,
    pub block_comment_start2: Option<&'static str>,
    pub block_comment_end2: Option<&'static str>,
    pub single_comment: Option<&'static str>,
    pub block_string_start: Option<&'static str>,
    pub block_string_end: Option<&'static str>,
    pub std_string_start_end: Option<&'static str>,
    pub block_end: Option<&'static str>,

    pub is_ident_char: fn(u8) -> bool,
    pub outline: fn(&str) -> Result<Vec<OutlineItem>>,

    pub keywords: &'static [&'static str],
    pub api_keywords: &'static [&'static str],
    pub use_structured_edition: bool,

    pub demo: RomBlob,
    pub mark: RomBlob,
}

pub static R_SCRIPT: ScriptDescriptor = ScriptDescriptor {
    id: R_SCRIPT_ID,
    name: "r",
    file_extension: ".r",
    project_comment: PROJECT_COMMENT,

    block_comment_start: None,
    block_comment_end: None,
    block_comment_start2: None,
    block_comment_end2: None,
    single_comment: Some(SINGLE_COMMENT),
    block_string_start: Some(STRING_DELIMITER),
    block_string_end: Some(STRING_DELIMITER),
    std_string_start_end: Some(STRING_DELIMITER),
    block_end: None,

    is_ident_char,
    outline,

    keywords: R_KEYWORDS,
    api_keywords: API_KEYWORDS,
    use_structured_edition: false,

    demo: RomBlob {
        data: DEMO_ROM,
        name: None,
    },
    mark: RomBlob {
        data: MARK_ROM,
        name: Some("rmark.tic"),
    },
};

pub fn descriptor() -> &'static ScriptDescriptor {
    &R_SCRIPT
}
