//! Chain-ordering and fold-semantics tests for the hook registry.

use pack_hooks::{FilterArgs, Filtered, HookRegistry};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Callback appending a tag to an array value, to observe execution order.
fn push_tag(tag: &'static str) -> impl Fn(Value, &FilterArgs<'_>) -> Filtered {
    move |value, _| {
        let mut items = value.as_array().cloned().unwrap_or_default();
        items.push(json!(tag));
        Filtered::Keep(Value::Array(items))
    }
}

/// Callback transforming a string value.
fn map_str<F>(transform: F) -> impl Fn(Value, &FilterArgs<'_>) -> Filtered
where
    F: Fn(&str) -> String,
{
    move |value, _| {
        let text = value.as_str().unwrap_or_default();
        Filtered::Keep(json!(transform(text)))
    }
}

fn to_kebab_case(text: &str) -> String {
    text.split([' ', '_'])
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[test]
fn test_callbacks_run_in_ascending_priority_then_insertion_order() {
    let mut registry = HookRegistry::new();
    registry.add_filter_at("loaders/js", 10, push_tag("a"));
    registry.add_filter_at("loaders/js", 10, push_tag("b"));
    registry.add_filter_at("loaders/js", 3, push_tag("c"));
    registry.add_filter_at("loaders/js", 22, push_tag("d"));
    registry.add_filter_at("loaders/js", 7, push_tag("e"));
    registry.add_filter_at("loaders/js", 7, push_tag("f"));
    // A second hook must stay unaffected.
    registry.add_filter("loaders/css", push_tag("x"));

    let out = registry
        .apply_filters("loaders/js", json!([]), &FilterArgs::default())
        .into_value()
        .unwrap();
    assert_eq!(out, json!(["c", "e", "f", "a", "b", "d"]));

    let css = registry
        .apply_filters("loaders/css", json!([]), &FilterArgs::default())
        .into_value()
        .unwrap();
    assert_eq!(css, json!(["x"]));
}

#[test]
fn test_fold_feeds_each_callback_the_previous_output() {
    let mut registry = HookRegistry::new();
    registry.add_filter("words", map_str(to_kebab_case));
    registry.add_filter("words", map_str(str::to_uppercase));

    let out = registry.apply_filters("words", json!("Pasta Carbonara"), &FilterArgs::default());
    assert_eq!(out, Filtered::Keep(json!("PASTA-CARBONARA")));
}

#[test]
fn test_fold_ordering_across_mixed_priorities() {
    let mut registry = HookRegistry::new();
    registry.add_filter_at("words", 9, map_str(str::to_lowercase));
    registry.add_filter_at("words", 10, map_str(|text| {
        text.split(' ').rev().collect::<Vec<_>>().join(" ")
    }));
    registry.add_filter_at("words", 10, map_str(|text| text.chars().rev().collect()));
    registry.add_filter_at("words", 11, map_str(to_kebab_case));

    let out = registry.apply_filters("words", json!("Pasta Carbonara"), &FilterArgs::default());
    assert_eq!(out, Filtered::Keep(json!("atsap-aranobrac")));
}

#[test]
fn test_duplicate_registration_runs_twice() {
    let mut registry = HookRegistry::new();
    registry.add_filter("count", push_tag("again"));
    registry.add_filter("count", push_tag("again"));

    let out = registry
        .apply_filters("count", json!([]), &FilterArgs::default())
        .into_value()
        .unwrap();
    assert_eq!(out, json!(["again", "again"]));
}

#[test]
fn test_remove_ends_the_chain() {
    let mut registry = HookRegistry::new();
    registry.add_filter_at("loaders/sass", 5, |_, _| Filtered::Remove);
    registry.add_filter("loaders/sass", push_tag("unreached"));

    let out = registry.apply_filters("loaders/sass", json!([]), &FilterArgs::default());
    assert!(out.is_removed());
}

#[test]
fn test_extra_args_reach_every_callback() {
    let config = json!({ "devServer": { "port": 9090 } });
    let args = FilterArgs {
        preset: Some("development"),
        config: Some(&config),
    };

    let mut registry = HookRegistry::new();
    registry.add_filter("loaders/js", |value, args| {
        assert_eq!(args.preset, Some("development"));
        let port = args
            .config
            .and_then(|config| config.pointer("/devServer/port"))
            .cloned();
        assert_eq!(port, Some(json!(9090)));
        Filtered::Keep(value)
    });

    let out = registry.apply_filters("loaders/js", json!({}), &args);
    assert_eq!(out, Filtered::Keep(json!({})));
}
