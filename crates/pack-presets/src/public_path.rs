//! Public-path inference
//!
//! When a caller supplies a dev-server port but no explicit public
//! path, the presets synthesize a `localhost` URL from the output
//! directory and remember it per directory, so sibling configurations
//! emitting into the same directory agree on one path.

use std::path::PathBuf;

use pack_merge::find_in;
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::Context;

/// Whether the caller asked for a secure dev server.
///
/// Checks the current `devServer.server` flag and the deprecated
/// boolean `devServer.https` flag.
fn is_secure(config: &Value) -> bool {
    if find_in(config, "devServer.https") == Some(&Value::Bool(true)) {
        warn!("devServer.https is deprecated; set devServer.server to \"https\" instead");
        return true;
    }
    find_in(config, "devServer.server").and_then(Value::as_str) == Some("https")
}

/// Infer a dev-server public path from the configured output path.
///
/// The result is `{scheme}://localhost:{port}/{relative-output-path}/`,
/// where the relative path drops the working-directory prefix and
/// carries no leading slash and exactly one trailing slash. The result
/// is cached on the context, keyed by the output directory. Returns
/// `None` when neither the config nor the defaults name an output path.
pub fn infer_public_path(
    ctx: &Context,
    config: &Value,
    port: u16,
    defaults: &Value,
) -> Option<String> {
    let output_path = find_in(config, "output.path")
        .or_else(|| find_in(defaults, "output.path"))
        .and_then(Value::as_str)?;

    let scheme = if is_secure(config) { "https" } else { "http" };

    let working_dir = ctx.working_dir().to_string_lossy();
    let relative = output_path
        .strip_prefix(working_dir.as_ref())
        .unwrap_or(output_path)
        .trim_matches('/');

    let public_path = format!("{scheme}://localhost:{port}/{relative}/");
    debug!(output_path, public_path, "inferred public path");

    ctx.cache_public_path(PathBuf::from(output_path), public_path.clone());
    Some(public_path)
}
