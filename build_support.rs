// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

// Shared cfg_aliases configuration function
// Called in build.rs: setup_tic_r_cfg_aliases();

fn setup_tic_r_cfg_aliases() {
    use cfg_aliases::cfg_aliases;

    cfg_aliases! {
        // Platform aliases
        wasm: { target_arch = "wasm32" },

        // Interpreter backend aliases
        embedded_r: { all(feature = "embedded-r", not(wasm)) },

        // File logging is native only
        file_log: { all(feature = "log4rs", not(wasm)) },
    }
}
