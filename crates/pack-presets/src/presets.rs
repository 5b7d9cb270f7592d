//! Development and production preset composers
//!
//! A preset assembles an opinionated defaults tree by invoking the
//! loader and plugin factories in a fixed pipeline order, infers a
//! public path and manifest wiring where the caller gave it enough to
//! work with, strips suppressed fragments, and finally deep-merges the
//! caller's partial configuration over the computed defaults.

use std::path::{Path, PathBuf};

use pack_hooks::{FilterArgs, Filtered};
use pack_merge::{deep_merge, find_in, sentinel};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config;
use crate::context::Context;
use crate::loaders::LoaderKey;
use crate::plugins::{self, PluginKind};

/// Hook receiving each preset's assembled stylesheet rule as one unit,
/// so a consumer can swap the whole style pipeline in one callback.
pub const STYLESHEET_HOOK: &str = "presets/stylesheet";

/// Build mode a preset composes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetMode {
    Development,
    Production,
}

impl PresetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Promote a partial configuration into a full development-oriented one.
pub fn development(ctx: &Context, config: &Value) -> Value {
    compose(ctx, config, PresetMode::Development)
}

/// Promote a partial configuration into a full production-oriented one.
pub fn production(ctx: &Context, config: &Value) -> Value {
    compose(ctx, config, PresetMode::Production)
}

fn compose(ctx: &Context, caller: &Value, mode: PresetMode) -> Value {
    let args = FilterArgs {
        preset: Some(mode.as_str()),
        config: Some(caller),
    };

    let mut defaults = match mode {
        PresetMode::Development => development_defaults(ctx, caller, &args),
        PresetMode::Production => production_defaults(ctx, caller, &args),
    };

    // Inject a default entry point when the caller named none.
    if find_in(caller, "entry").is_none() {
        defaults["entry"] = json!({ "index": path_str(&ctx.file_path("src/index.js")) });
    }

    let output_dir = output_directory(caller, &defaults);

    match mode {
        PresetMode::Development => {
            let explicit = find_in(caller, "output.publicPath")
                .and_then(Value::as_str)
                .map(String::from);
            let port = find_in(caller, "devServer.port")
                .and_then(Value::as_u64)
                .and_then(|port| u16::try_from(port).ok());
            let public_path = match (explicit, port) {
                (Some(path), _) => Some(path),
                (None, Some(port)) => {
                    crate::public_path::infer_public_path(ctx, caller, port, &defaults)
                }
                // Sibling configurations without their own port reuse
                // the path already inferred for this directory.
                (None, None) => ctx.public_path_for(&output_dir),
            };
            if let Some(public_path) = public_path {
                defaults["output"]["publicPath"] = json!(public_path);
                inject_manifest(ctx, caller, &mut defaults, "asset-manifest.json", &output_dir);
            }
        }
        PresetMode::Production => {
            let has_css_plugin = find_in(caller, "plugins")
                .and_then(|list| plugins::find_existing_instance(list, PluginKind::MiniCssExtract))
                .is_some();
            if !has_css_plugin {
                push_plugin(&mut defaults, plugins::mini_css_extract(None));
            }
            inject_manifest(
                ctx,
                caller,
                &mut defaults,
                "production-asset-manifest.json",
                &output_dir,
            );
        }
    }

    // Drop every suppressed fragment before the caller's overrides land.
    let defaults = sentinel::strip(&defaults).unwrap_or_else(|| Value::Object(Map::new()));
    deep_merge(&defaults, caller)
}

fn development_defaults(ctx: &Context, caller: &Value, args: &FilterArgs<'_>) -> Value {
    let mut dev_server = config::dev_server();
    dev_server["stats"] = config::stats();

    json!({
        "mode": "development",
        "devtool": "cheap-module-source-map",
        "context": path_str(ctx.working_dir()),
        "output": {
            "path": path_str(&ctx.file_path("build")),
            // Annotate generated requires with module path comments.
            "pathinfo": true,
            "filename": "[name].js",
            "chunkFilename": "[name].[contenthash].chunk.js",
        },
        "module": {
            "strictExportPresence": true,
            "rules": module_rules(ctx, args, PresetMode::Development, caller),
        },
        "optimization": {
            "nodeEnv": "development",
        },
        "devServer": dev_server,
        "plugins": [plugins::hot_module_replacement()],
    })
}

fn production_defaults(ctx: &Context, caller: &Value, args: &FilterArgs<'_>) -> Value {
    // Honor a requested devtool in the CSS minimizer; inline variants
    // carry their own maps.
    let css_minimizer_options = match find_in(caller, "devtool").and_then(Value::as_str) {
        Some(devtool) if !devtool.contains("inline-") => Some(json!({
            "cssProcessorOptions": { "map": { "inline": false } },
        })),
        _ => None,
    };

    json!({
        "mode": "production",
        "devtool": false,
        "context": path_str(ctx.working_dir()),
        "output": {
            "path": path_str(&ctx.file_path("build")),
            "pathinfo": false,
            "filename": "[name].js",
            "chunkFilename": "[name].[contenthash].chunk.js",
        },
        "module": {
            "strictExportPresence": true,
            "rules": module_rules(ctx, args, PresetMode::Production, caller),
        },
        "optimization": {
            "minimizer": [
                plugins::terser(None),
                plugins::optimize_css_assets(css_minimizer_options.as_ref()),
            ],
            "nodeEnv": "production",
            "noEmitOnErrors": true,
        },
        "stats": config::stats(),
        "plugins": [],
    })
}

/// Assemble the ordered module-rule list for one mode.
fn module_rules(ctx: &Context, args: &FilterArgs<'_>, mode: PresetMode, caller: &Value) -> Value {
    let table = ctx.loaders();
    let mut rules = Vec::new();

    // Lint everything first, when the linter toolchain is present.
    if ctx.is_installed("eslint") {
        let options = match mode {
            PresetMode::Development => Some(json!({ "options": { "emitWarning": true } })),
            PresetMode::Production => None,
        };
        if let Some(rule) = table.generate(&ctx.hooks, LoaderKey::Eslint, options.as_ref(), args) {
            rules.push(rule);
        }
    }

    // First matching alternative wins; "file" catches whatever is left.
    let mut one_of = Vec::new();
    if ctx.is_installed("typescript") {
        if let Some(rule) = table.generate(&ctx.hooks, LoaderKey::Ts, None, args) {
            one_of.push(rule);
        }
    }
    for key in [LoaderKey::Js, LoaderKey::Url] {
        if let Some(rule) = table.generate(&ctx.hooks, key, None, args) {
            one_of.push(rule);
        }
    }
    if let Some(rule) = stylesheet_rule(ctx, args, mode, caller) {
        one_of.push(rule);
    }
    if let Some(rule) = table.generate(&ctx.hooks, LoaderKey::File, None, args) {
        one_of.push(rule);
    }
    rules.push(json!({ "oneOf": one_of }));

    Value::Array(rules)
}

/// Assemble the stylesheet chain and pass it through its hook whole.
fn stylesheet_rule(
    ctx: &Context,
    args: &FilterArgs<'_>,
    mode: PresetMode,
    caller: &Value,
) -> Option<Value> {
    let table = ctx.loaders();
    let mut chain: Vec<Value> = Vec::new();

    match mode {
        PresetMode::Development => {
            let source_map = json!({ "options": { "sourceMap": true } });
            let stages = [
                (LoaderKey::Style, None),
                (LoaderKey::Css, Some(&source_map)),
                (LoaderKey::Postcss, Some(&source_map)),
                (LoaderKey::Sass, Some(&source_map)),
            ];
            for (key, options) in stages {
                if let Some(loader) = table.generate(&ctx.hooks, key, options, args) {
                    chain.push(loader);
                }
            }
        }
        PresetMode::Production => {
            // Extract CSS to its own file instead of inlining styles.
            chain.push(json!(plugins::MINI_CSS_EXTRACT_LOADER));
            let css_options = is_truthy(find_in(caller, "devtool"))
                .then(|| json!({ "options": { "sourceMap": true } }));
            for key in [LoaderKey::Css, LoaderKey::Postcss, LoaderKey::Sass] {
                if let Some(loader) = table.generate(&ctx.hooks, key, css_options.as_ref(), args) {
                    chain.push(loader);
                }
            }
        }
    }

    let rule = json!({ "test": "\\.s?css$", "use": chain });
    match ctx.hooks.apply_filters(STYLESHEET_HOOK, rule, args) {
        Filtered::Keep(rule) => Some(rule),
        Filtered::Remove => None,
    }
}

/// Append a manifest plugin wired to the shared per-directory seed,
/// unless the caller already brought one.
fn inject_manifest(
    ctx: &Context,
    caller: &Value,
    defaults: &mut Value,
    file_name: &str,
    output_dir: &Path,
) {
    let has_manifest = find_in(caller, "plugins")
        .and_then(|list| plugins::find_existing_instance(list, PluginKind::Manifest))
        .is_some();
    if has_manifest {
        return;
    }
    // Materialize the shared seed so sibling configurations targeting
    // this directory accumulate into one manifest.
    let _seed = ctx.seed_for(output_dir);
    debug!(directory = %output_dir.display(), file_name, "injecting manifest plugin");
    push_plugin(
        defaults,
        plugins::manifest(Some(&json!({
            "fileName": file_name,
            "seed": path_str(output_dir),
        }))),
    );
}

fn push_plugin(defaults: &mut Value, plugin: Value) {
    if let Some(list) = defaults["plugins"].as_array_mut() {
        list.push(plugin);
    }
}

fn output_directory(caller: &Value, defaults: &Value) -> PathBuf {
    find_in(caller, "output.path")
        .or_else(|| find_in(defaults, "output.path"))
        .and_then(Value::as_str)
        .map(PathBuf::from)
        .unwrap_or_default()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}
