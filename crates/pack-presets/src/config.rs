//! Shared configuration fragments
//!
//! Reusable pieces consumers can compose into a full configuration
//! tree, and which the presets fold into their defaults.

use serde_json::{json, Value};

/// Dev-server options permitting consumption from another origin.
pub fn dev_server() -> Value {
    json!({
        "allowedHosts": "all",
        "headers": {
            "Access-Control-Allow-Origin": "*",
            "Access-Control-Allow-Methods": "*",
            "Access-Control-Allow-Headers": "*",
        },
        // Gzip generated files.
        "compress": true,
        "hot": "only",
        "client": {
            // No disruptive overlay for mere warnings.
            "overlay": {
                "errors": true,
                "warnings": false,
            },
        },
    })
}

/// Minimal stats fragment keeping build output quiet.
pub fn stats() -> Value {
    json!({
        "preset": "summary",
        "assets": true,
        "colors": true,
        "errors": true,
        "warnings": true,
    })
}
