//! Preset composition for pack-compose
//!
//! Builds complete bundler configuration trees from partial,
//! caller-supplied ones: a composition context carries the hook
//! registry and directory-keyed caches, loader and plugin factories
//! emit filterable fragments, and the development/production presets
//! tie the pipeline together.

pub mod config;
pub mod context;
pub mod error;
pub mod loaders;
pub mod logging;
pub mod plugins;
pub mod ports;
pub mod presets;
pub mod probe;
pub mod public_path;

pub use context::{Context, ContextBuilder, Seed};
pub use error::{Error, Result};
pub use loaders::{LoaderKey, LoaderTable, LoaderTableBuilder};
pub use plugins::PluginKind;
pub use presets::{development, production, PresetMode, STYLESHEET_HOOK};
pub use probe::{NodeModulesProbe, PackageProbe, StaticProbe};
pub use public_path::infer_public_path;
