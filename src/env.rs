// RustPixel - R Script Adapter
// copyright zipxing@hotmail.com 2022～2025

//! Environment R expects before it starts.

use log::info;
use std::{collections::BTreeMap, env};

/// Sets every variable in `defaults` that is unset or empty, returning the
/// names that were set.
pub fn ensure_defaults(defaults: &BTreeMap<String, String>) -> Vec<String> {
    let mut set = vec![];
    for (name, value) in defaults {
        let present = env::var_os(name).is_some_and(|v| !v.is_empty());
        if !present {
            env::set_var(name, value);
            info!("set {}={}", name, value);
            set.push(name.clone());
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_only_missing() {
        env::set_var("TIC_R_TEST_PRESENT", "keep");
        env::remove_var("TIC_R_TEST_MISSING");
        let defaults = BTreeMap::from([
            ("TIC_R_TEST_PRESENT".to_string(), "other".to_string()),
            ("TIC_R_TEST_MISSING".to_string(), "/opt/R".to_string()),
        ]);

        assert_eq!(ensure_defaults(&defaults), vec!["TIC_R_TEST_MISSING".to_string()]);
        assert_eq!(env::var("TIC_R_TEST_PRESENT").unwrap(), "keep");
        assert_eq!(env::var("TIC_R_TEST_MISSING").unwrap(), "/opt/R");

        // second call is a no-op
        assert!(ensure_defaults(&defaults).is_empty());
    }
}
