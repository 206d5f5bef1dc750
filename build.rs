// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! Build script: cfg aliases and bundled cartridge blobs.
//!
//! The demo and benchmark cartridges are produced by the TIC-80 asset
//! pipeline. They are picked up from `TIC_R_DEMO_ROM` / `TIC_R_MARK_ROM` or
//! from `assets/`, and copied into `OUT_DIR` so `include_bytes!` always has a
//! file to read. A missing cartridge becomes an empty blob.

use std::{env, fs, path::PathBuf};

include!("build_support.rs");

fn stage_rom(var: &str, default: &str, out: &str) {
    println!("cargo:rerun-if-env-changed={}", var);
    let src = env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default));
    println!("cargo:rerun-if-changed={}", src.display());

    let data = fs::read(&src).unwrap_or_default();
    if data.is_empty() {
        println!("cargo:warning={} not found, bundling empty rom", src.display());
    }
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join(out), data).unwrap();
}

fn main() {
    setup_tic_r_cfg_aliases();
    stage_rom("TIC_R_DEMO_ROM", "assets/rdemo.tic", "rdemo.tic.dat");
    stage_rom("TIC_R_MARK_ROM", "assets/rmark.tic", "rmark.tic.dat");
}
