//! Composition context
//!
//! Owns the hook registry, the loader factory table, and the
//! directory-keyed caches that the original design kept as process-wide
//! singletons. Callers construct one context and thread it through
//! preset invocations, which gives tests isolated state and lets
//! concurrent hosts run one context per task. The caches are
//! mutex-guarded so a context shared between threads stays coherent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use pack_hooks::HookRegistry;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::loaders::LoaderTable;
use crate::probe::{NodeModulesProbe, PackageProbe};

/// Shared manifest accumulator for one output directory.
///
/// Every configuration tree emitting into the same directory receives a
/// clone of the same `Arc`, so their manifests accumulate into one map.
pub type Seed = Arc<Mutex<Map<String, Value>>>;

pub struct Context {
    /// Filter registry consulted by every factory and preset seam.
    pub hooks: HookRegistry,
    loaders: LoaderTable,
    working_dir: PathBuf,
    probe: Box<dyn PackageProbe>,
    seeds: Mutex<HashMap<PathBuf, Seed>>,
    public_paths: Mutex<HashMap<PathBuf, String>>,
}

impl Context {
    /// Create a context with default settings, rooted at the current
    /// working directory.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start building a customized context.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// The directory all relative configuration paths resolve against.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The loader factory table this context composes with.
    pub fn loaders(&self) -> &LoaderTable {
        &self.loaders
    }

    /// Resolve a working directory-relative path to an absolute one.
    pub fn file_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.working_dir.join(relative)
    }

    /// Whether a package resolves from the working directory.
    ///
    /// Evaluated fresh on every call; see [`crate::probe`].
    pub fn is_installed(&self, package: &str) -> bool {
        self.probe.is_installed(&self.working_dir, package)
    }

    /// The shared manifest seed for an output directory.
    ///
    /// Created lazily on first request; the same directory always yields
    /// the same `Arc`, distinct directories yield distinct seeds.
    pub fn seed_for(&self, directory: impl AsRef<Path>) -> Seed {
        let mut seeds = self.seeds.lock().unwrap_or_else(PoisonError::into_inner);
        seeds
            .entry(directory.as_ref().to_path_buf())
            .or_default()
            .clone()
    }

    /// A previously inferred public path for an output directory.
    pub fn public_path_for(&self, directory: impl AsRef<Path>) -> Option<String> {
        let paths = self
            .public_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        paths.get(directory.as_ref()).cloned()
    }

    pub(crate) fn cache_public_path(&self, directory: impl Into<PathBuf>, public_path: String) {
        let mut paths = self
            .public_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        paths.insert(directory.into(), public_path);
    }
}

/// Builder separating permanent context customization from per-call
/// preset arguments.
#[derive(Default)]
pub struct ContextBuilder {
    hooks: Option<HookRegistry>,
    loaders: Option<LoaderTable>,
    working_dir: Option<PathBuf>,
    probe: Option<Box<dyn PackageProbe>>,
}

impl ContextBuilder {
    /// Seed the context with a pre-populated hook registry.
    pub fn hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Use a loader table with baked-in permanent customizations.
    pub fn loaders(mut self, loaders: LoaderTable) -> Self {
        self.loaders = Some(loaders);
        self
    }

    /// Root the context at an explicit working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replace the installed-package probe.
    pub fn probe(mut self, probe: impl PackageProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Build the context. Fails only when no working directory was given
    /// and the process working directory cannot be determined.
    pub fn build(self) -> Result<Context> {
        let working_dir = match self.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(Error::WorkingDir)?,
        };
        Ok(Context {
            hooks: self.hooks.unwrap_or_default(),
            loaders: self.loaders.unwrap_or_default(),
            working_dir,
            probe: self.probe.unwrap_or_else(|| Box::new(NodeModulesProbe)),
            seeds: Mutex::new(HashMap::new()),
            public_paths: Mutex::new(HashMap::new()),
        })
    }
}
