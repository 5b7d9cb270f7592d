//! Loader factory table
//!
//! Each loader key owns a default configuration template. Generating a
//! loader runs the template through the `loaders/<key>/defaults` hook,
//! deep-merges per-call options over the filtered defaults, then runs
//! the result through the `loaders/<key>` hook, which may suppress the
//! fragment outright. Permanent customizations are baked in when the
//! table is built, keeping them distinct from per-call overrides.

use std::collections::HashMap;
use std::fmt;

use pack_hooks::{FilterArgs, Filtered, HookRegistry};
use pack_merge::deep_merge;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Keys of the built-in loader factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoaderKey {
    Eslint,
    Js,
    Ts,
    Url,
    Style,
    Css,
    Postcss,
    Sass,
    File,
}

impl LoaderKey {
    pub const ALL: [LoaderKey; 9] = [
        Self::Eslint,
        Self::Js,
        Self::Ts,
        Self::Url,
        Self::Style,
        Self::Css,
        Self::Postcss,
        Self::Sass,
        Self::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eslint => "eslint",
            Self::Js => "js",
            Self::Ts => "ts",
            Self::Url => "url",
            Self::Style => "style",
            Self::Css => "css",
            Self::Postcss => "postcss",
            Self::Sass => "sass",
            Self::File => "file",
        }
    }

    /// Parse a loader key from its table name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }

    /// Hook name filtering this loader's final fragment.
    pub fn hook(&self) -> String {
        format!("loaders/{}", self.as_str())
    }

    /// Hook name filtering this loader's baseline defaults.
    pub fn defaults_hook(&self) -> String {
        format!("loaders/{}/defaults", self.as_str())
    }
}

impl fmt::Display for LoaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in default template for one loader key.
///
/// Test patterns are opaque regex strings; the composer never merges
/// into them.
fn template(key: LoaderKey) -> Value {
    match key {
        LoaderKey::Eslint => json!({
            "test": "\\.jsx?$",
            "exclude": "(node_modules|bower_components)",
            "enforce": "pre",
            "loader": "eslint-loader",
            "options": {},
        }),
        LoaderKey::Js => json!({
            "test": "\\.jsx?$",
            "exclude": "(node_modules|bower_components)",
            "loader": "babel-loader",
            "options": {
                // Cache compilation results between builds.
                "cacheDirectory": true,
            },
        }),
        LoaderKey::Ts => json!({
            "test": "\\.tsx?$",
            "exclude": "(node_modules|bower_components)",
            "loader": "ts-loader",
        }),
        LoaderKey::Url => json!({
            "test": "\\.(png|jpg|jpeg|gif|svg|woff|woff2|eot|ttf)$",
            "loader": "url-loader",
            "options": {
                "limit": 10000,
            },
        }),
        LoaderKey::Style => json!({
            "loader": "style-loader",
            "options": {},
        }),
        LoaderKey::Css => json!({
            "loader": "css-loader",
            "options": {
                "importLoaders": 1,
            },
        }),
        LoaderKey::Postcss => json!({
            "loader": "postcss-loader",
            "options": {
                "ident": "postcss",
                "plugins": [
                    "postcss-flexbugs-fixes",
                    { "autoprefixer": { "flexbox": "no-2009" } },
                ],
            },
        }),
        LoaderKey::Sass => json!({
            "loader": "sass-loader",
            "options": {},
        }),
        LoaderKey::File => json!({
            // Match anything except code and markup outputs.
            "exclude": "\\.(js|html|json)$",
            "loader": "file-loader",
            "options": {},
        }),
    }
}

/// The named loader generator table.
pub struct LoaderTable {
    defaults: HashMap<LoaderKey, Value>,
}

impl LoaderTable {
    /// A table holding only the built-in templates.
    pub fn new() -> Self {
        Self {
            defaults: LoaderKey::ALL
                .into_iter()
                .map(|key| (key, template(key)))
                .collect(),
        }
    }

    /// Start building a table with permanent customizations.
    pub fn builder() -> LoaderTableBuilder {
        LoaderTableBuilder {
            overrides: Vec::new(),
        }
    }

    /// The effective default template for a key, customizations included.
    pub fn defaults(&self, key: LoaderKey) -> &Value {
        // Every key is populated at construction time.
        &self.defaults[&key]
    }

    /// Generate one loader fragment.
    ///
    /// Pipeline: defaults -> `loaders/<key>/defaults` hook -> deep merge
    /// of per-call options -> `loaders/<key>` hook. A suppression at
    /// either seam yields `None`, and the caller excises the fragment
    /// from its containing sequence.
    pub fn generate(
        &self,
        hooks: &HookRegistry,
        key: LoaderKey,
        options: Option<&Value>,
        args: &FilterArgs<'_>,
    ) -> Option<Value> {
        let defaults = self.defaults(key).clone();
        let defaults = match hooks.apply_filters(&key.defaults_hook(), defaults, args) {
            Filtered::Keep(value) => value,
            Filtered::Remove => return None,
        };
        let merged = match options {
            Some(options) => deep_merge(&defaults, options),
            None => defaults,
        };
        hooks.apply_filters(&key.hook(), merged, args).into_value()
    }
}

impl Default for LoaderTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder baking permanent template customizations into a table.
///
/// Customizations are deep-merged over the built-in templates once, at
/// build time, replacing the original design's mutable `.defaults`
/// property on each factory function.
pub struct LoaderTableBuilder {
    overrides: Vec<(LoaderKey, Value)>,
}

impl LoaderTableBuilder {
    /// Permanently customize one loader's default template.
    pub fn defaults(mut self, key: LoaderKey, overrides: Value) -> Self {
        self.overrides.push((key, overrides));
        self
    }

    pub fn build(self) -> LoaderTable {
        let mut table = LoaderTable::new();
        for (key, overrides) in self.overrides {
            let merged = deep_merge(&table.defaults[&key], &overrides);
            table.defaults.insert(key, merged);
        }
        table
    }
}
