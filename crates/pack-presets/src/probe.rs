//! Installed-package probing
//!
//! Presets consult the probe on every invocation to decide whether
//! optional toolchains (linter, type checker) get a loader. Results are
//! deliberately not cached so monorepo workspaces with differing
//! installed toolchains stay fresh.

use std::collections::HashSet;
use std::path::Path;

/// Check whether a package can be resolved from a working directory.
///
/// Any failure collapses to `false`; probing never errors.
pub trait PackageProbe: Send + Sync {
    fn is_installed(&self, working_dir: &Path, package: &str) -> bool;
}

/// Default probe walking `node_modules` directories upward from the
/// working directory, the way host module resolution does.
#[derive(Debug, Default)]
pub struct NodeModulesProbe;

impl PackageProbe for NodeModulesProbe {
    fn is_installed(&self, working_dir: &Path, package: &str) -> bool {
        let mut current = Some(working_dir);
        while let Some(dir) = current {
            if dir
                .join("node_modules")
                .join(package)
                .join("package.json")
                .is_file()
            {
                return true;
            }
            current = dir.parent();
        }
        false
    }
}

/// Probe answering from a fixed set, for tests and hermetic builds.
#[derive(Debug, Default)]
pub struct StaticProbe {
    installed: HashSet<String>,
}

impl StaticProbe {
    /// A probe reporting nothing as installed.
    pub fn none() -> Self {
        Self::default()
    }

    /// A probe reporting exactly the given packages as installed.
    pub fn with<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: packages.into_iter().map(Into::into).collect(),
        }
    }
}

impl PackageProbe for StaticProbe {
    fn is_installed(&self, _working_dir: &Path, package: &str) -> bool {
        self.installed.contains(package)
    }
}
