//! Plugin factory table
//!
//! Plugins are tagged configuration fragments: a `"plugin"` key naming
//! the kind, alongside that plugin's options. Factories apply the
//! opinionated defaults the presets rely on; existing-instance checks
//! scan a plugins array by nominal kind.

use std::fmt;

use pack_merge::deep_merge;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Key tagging a plugin fragment with its kind.
pub const KIND_KEY: &str = "plugin";

/// Loader reference heading a production stylesheet chain, so extracted
/// CSS lands in its own file.
pub const MINI_CSS_EXTRACT_LOADER: &str = "mini-css-extract-plugin/loader";

/// Kinds of the built-in plugin factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginKind {
    BundleAnalyzer,
    Clean,
    Copy,
    ErrorBell,
    FixStyleOnlyEntries,
    HotModuleReplacement,
    Manifest,
    MiniCssExtract,
    OptimizeCssAssets,
    Terser,
}

impl PluginKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BundleAnalyzer => "bundle-analyzer",
            Self::Clean => "clean",
            Self::Copy => "copy",
            Self::ErrorBell => "error-bell",
            Self::FixStyleOnlyEntries => "fix-style-only-entries",
            Self::HotModuleReplacement => "hot-module-replacement",
            Self::Manifest => "manifest",
            Self::MiniCssExtract => "mini-css-extract",
            Self::OptimizeCssAssets => "optimize-css-assets",
            Self::Terser => "terser",
        }
    }

    /// Parse a plugin kind from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        [
            Self::BundleAnalyzer,
            Self::Clean,
            Self::Copy,
            Self::ErrorBell,
            Self::FixStyleOnlyEntries,
            Self::HotModuleReplacement,
            Self::Manifest,
            Self::MiniCssExtract,
            Self::OptimizeCssAssets,
            Self::Terser,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a plugin fragment, when it carries a known tag.
pub fn kind_of(plugin: &Value) -> Option<PluginKind> {
    plugin
        .get(KIND_KEY)
        .and_then(Value::as_str)
        .and_then(PluginKind::parse)
}

/// Find an existing instance of a plugin kind in a plugins array.
///
/// A non-array (or absent) plugins value counts as "no instance".
pub fn find_existing_instance(plugins: &Value, kind: PluginKind) -> Option<&Value> {
    plugins
        .as_array()?
        .iter()
        .find(|plugin| kind_of(plugin) == Some(kind))
}

fn tagged(kind: PluginKind, defaults: Value, options: Option<&Value>) -> Value {
    let mut base = defaults;
    base[KIND_KEY] = json!(kind.as_str());
    match options {
        Some(options) => deep_merge(&base, options),
        None => base,
    }
}

/// Bundle-size analyzer, enabled only when `--analyze` was passed on
/// the command line.
pub fn bundle_analyzer(options: Option<&Value>) -> Value {
    let mode = if std::env::args().any(|arg| arg == "--analyze") {
        "static"
    } else {
        "disabled"
    };
    tagged(
        PluginKind::BundleAnalyzer,
        json!({
            "analyzerMode": mode,
            "openAnalyzer": false,
            "reportFilename": "bundle-analyzer-report.html",
        }),
        options,
    )
}

/// Output-directory cleaner.
pub fn clean(options: Option<&Value>) -> Value {
    tagged(PluginKind::Clean, json!({}), options)
}

/// Static file copier.
pub fn copy(options: Option<&Value>) -> Value {
    tagged(PluginKind::Copy, json!({}), options)
}

/// Audible bell on build errors.
pub fn error_bell() -> Value {
    tagged(PluginKind::ErrorBell, json!({}), None)
}

/// Removes the stray script files generated for style-only entries.
pub fn fix_style_only_entries(options: Option<&Value>) -> Value {
    tagged(PluginKind::FixStyleOnlyEntries, json!({}), options)
}

/// Hot module replacement.
pub fn hot_module_replacement() -> Value {
    tagged(PluginKind::HotModuleReplacement, json!({}), None)
}

/// Asset manifest writer.
///
/// The manifest seed accumulator itself lives in the composition
/// context, keyed by output directory; presets record that directory
/// under the fragment's `seed` key when they inject this plugin.
pub fn manifest(options: Option<&Value>) -> Value {
    tagged(
        PluginKind::Manifest,
        json!({
            "fileName": "asset-manifest.json",
            "writeToFileEmit": true,
        }),
        options,
    )
}

/// CSS extraction into standalone files.
pub fn mini_css_extract(options: Option<&Value>) -> Value {
    tagged(
        PluginKind::MiniCssExtract,
        json!({
            "filename": "[name].css",
        }),
        options,
    )
}

/// CSS asset minimizer.
pub fn optimize_css_assets(options: Option<&Value>) -> Value {
    tagged(PluginKind::OptimizeCssAssets, json!({}), options)
}

/// Script minimizer with settings derived from create-react-app's
/// configuration.
pub fn terser(options: Option<&Value>) -> Value {
    tagged(
        PluginKind::Terser,
        json!({
            "terserOptions": {
                // Parse modern syntax, but only emit transformations
                // that are safe for older targets.
                "parse": {
                    "ecma": 8,
                },
                "compress": {
                    "ecma": 5,
                    "warnings": false,
                    "comparisons": false,
                    "inline": 2,
                },
                "mangle": {
                    "safari10": true,
                },
                "output": {
                    "ecma": 5,
                    "comments": false,
                    "ascii_only": true,
                },
            },
            "extractComments": false,
        }),
        options,
    )
}
