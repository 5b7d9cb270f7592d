//! End-to-end composition scenarios across the hook registry, the
//! deep-merge composer, and the preset pipeline.

use pack_hooks::Filtered;
use pack_merge::{find_in, sentinel};
use pack_presets::plugins::find_existing_instance;
use pack_presets::{
    development, production, Context, PluginKind, StaticProbe, STYLESHEET_HOOK,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn test_context() -> Context {
    Context::builder()
        .working_dir("/project")
        .probe(StaticProbe::none())
        .build()
        .expect("explicit working dir never fails")
}

fn stylesheet_rule(tree: &Value) -> Option<&Value> {
    find_in(tree, "module.rules")?
        .as_array()?
        .iter()
        .find_map(|rule| rule.get("oneOf"))?
        .as_array()?
        .iter()
        .find(|rule| rule.get("use").is_some())
}

#[test]
fn test_global_loader_customization_reaches_both_presets() {
    let mut ctx = test_context();
    ctx.hooks.add_filter("loaders/js/defaults", |mut value, _| {
        value["exclude"] = json!("(node_modules|vendor)");
        Filtered::Keep(value)
    });

    for tree in [development(&ctx, &json!({})), production(&ctx, &json!({}))] {
        let rules = find_in(&tree, "module.rules").unwrap().as_array().unwrap();
        let one_of = rules[0]["oneOf"].as_array().unwrap();
        let js_rule = one_of
            .iter()
            .find(|rule| rule["loader"] == json!("babel-loader"))
            .unwrap();
        assert_eq!(js_rule["exclude"], json!("(node_modules|vendor)"));
    }
}

#[test]
fn test_swapping_the_entire_style_pipeline_in_one_hook() {
    let mut ctx = test_context();
    ctx.hooks.add_filter(STYLESHEET_HOOK, |_, args| {
        assert!(args.preset.is_some());
        Filtered::Keep(json!({
            "test": "\\.less$",
            "use": [{ "loader": "less-loader" }],
        }))
    });

    let tree = development(&ctx, &json!({}));
    let rule = stylesheet_rule(&tree).unwrap();
    assert_eq!(rule["test"], json!("\\.less$"));
    assert_eq!(rule["use"], json!([{ "loader": "less-loader" }]));
}

#[test]
fn test_development_and_production_share_one_manifest_seed() {
    let ctx = test_context();
    let config = json!({
        "devServer": { "port": 9090 },
        "output": { "path": "/project/build" },
    });
    let dev = development(&ctx, &config);
    let prod = production(&ctx, &json!({ "output": { "path": "/project/build" } }));

    let dev_manifest = find_existing_instance(&dev["plugins"], PluginKind::Manifest).unwrap();
    let prod_manifest = find_existing_instance(&prod["plugins"], PluginKind::Manifest).unwrap();
    assert_eq!(dev_manifest["seed"], prod_manifest["seed"]);
    assert_eq!(dev_manifest["fileName"], json!("asset-manifest.json"));
    assert_eq!(
        prod_manifest["fileName"],
        json!("production-asset-manifest.json")
    );

    let seed = ctx.seed_for("/project/build");
    assert!(std::sync::Arc::ptr_eq(&seed, &ctx.seed_for("/project/build")));
}

#[test]
fn test_deep_overrides_reach_any_nested_branch() {
    let ctx = test_context();
    let tree = development(
        &ctx,
        &json!({
            "optimization": { "nodeEnv": "test" },
            "devServer": { "headers": { "X-Custom": "1" } },
        }),
    );

    assert_eq!(find_in(&tree, "optimization.nodeEnv"), Some(&json!("test")));
    // Sibling header defaults survive the nested override.
    assert_eq!(find_in(&tree, "devServer.headers.X-Custom"), Some(&json!("1")));
    assert_eq!(
        find_in(&tree, "devServer.headers.Access-Control-Allow-Origin"),
        Some(&json!("*"))
    );
}

#[test]
fn test_unset_marker_deletes_a_preset_default() {
    let ctx = test_context();
    let tree = development(&ctx, &json!({ "devtool": sentinel::unset() }));
    assert!(tree.as_object().is_some_and(|map| !map.contains_key("devtool")));
}

#[test]
fn test_removing_a_filter_restores_defaults() {
    let mut ctx = test_context();
    let id = ctx.hooks.add_filter("loaders/url", |mut value, _| {
        value["options"]["limit"] = json!(1);
        Filtered::Keep(value)
    });

    let filtered = development(&ctx, &json!({}));
    let rules = find_in(&filtered, "module.rules").unwrap().as_array().unwrap();
    let url_rule = rules[0]["oneOf"]
        .as_array()
        .unwrap()
        .iter()
        .find(|rule| rule["loader"] == json!("url-loader"))
        .cloned()
        .unwrap();
    assert_eq!(find_in(&url_rule, "options.limit"), Some(&json!(1)));

    assert!(ctx.hooks.remove_filter("loaders/url", id));

    let restored = development(&ctx, &json!({}));
    let rules = find_in(&restored, "module.rules").unwrap().as_array().unwrap();
    let url_rule = rules[0]["oneOf"]
        .as_array()
        .unwrap()
        .iter()
        .find(|rule| rule["loader"] == json!("url-loader"))
        .cloned()
        .unwrap();
    assert_eq!(find_in(&url_rule, "options.limit"), Some(&json!(10000)));
}

#[test]
fn test_contexts_are_isolated() {
    let mut filtered_ctx = test_context();
    filtered_ctx.hooks.add_filter("loaders/js", |_, _| Filtered::Remove);
    let plain_ctx = test_context();

    let filtered = development(&filtered_ctx, &json!({}));
    let plain = development(&plain_ctx, &json!({}));

    let has_js = |tree: &Value| {
        find_in(tree, "module.rules")
            .and_then(Value::as_array)
            .and_then(|rules| rules[0]["oneOf"].as_array().cloned())
            .is_some_and(|one_of| {
                one_of
                    .iter()
                    .any(|rule| rule["loader"] == json!("babel-loader"))
            })
    };
    assert!(!has_js(&filtered));
    assert!(has_js(&plain));
}
