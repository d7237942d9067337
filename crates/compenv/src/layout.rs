// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! On-disk locations of environments and their installed components.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{
    ENVIRONMENTS_DIRNAME, ENV_CONFIG_FILENAME, MOUNTS_DIRNAME, RUNS_DIRNAME, SETTINGS_FILENAME,
    SHARED_DIRNAME, TEMP_DIRNAME,
};

#[cfg(test)]
#[path = "./layout_test.rs"]
mod layout_test;

/// Name of the default root directory under the user's home.
const DEFAULT_ROOT_DIRNAME: &str = ".compenv";

/// Resolves every path compenv reads or writes from a single root directory.
///
/// All methods are pure; nothing is created on disk except by [`Layout::ensure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The default root, `~/.compenv`.
    pub fn default_root() -> crate::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            crate::Error::ValidationFailed("Cannot resolve ~ without HOME".to_string())
        })?;
        Ok(home.join(DEFAULT_ROOT_DIRNAME))
    }

    /// Create the root, environments and temporary directories, returning a
    /// layout anchored at the canonical root.
    pub fn ensure(&self) -> crate::Result<Self> {
        for dir in [&self.root, &self.environments_dir(), &self.temp_dir()] {
            std::fs::create_dir_all(dir).map_err(|e| crate::Error::WriteFailed {
                path: dir.to_path_buf(),
                error: e,
            })?;
        }
        let root = dunce::canonicalize(&self.root)?;
        tracing::debug!(root = %root.display(), "using configuration directory");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Top-level settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILENAME)
    }

    pub fn environments_dir(&self) -> PathBuf {
        self.root.join(ENVIRONMENTS_DIRNAME)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join(TEMP_DIRNAME)
    }

    pub fn environment_dir(&self, env_id: Uuid) -> PathBuf {
        self.environments_dir().join(env_id.to_string())
    }

    pub fn environment_config(&self, env_id: Uuid) -> PathBuf {
        self.environment_dir(env_id).join(ENV_CONFIG_FILENAME)
    }

    /// Directory exposed to every component declaring a `shared` mount.
    pub fn shared_dir(&self, env_id: Uuid) -> PathBuf {
        self.environment_dir(env_id).join(SHARED_DIRNAME)
    }

    pub fn component_dir(&self, env_id: Uuid, name: &str, version: &str) -> PathBuf {
        self.environment_dir(env_id).join(name).join(version)
    }

    /// Holds log files of image pulls and job runs.
    pub fn runs_dir(&self, env_id: Uuid, name: &str, version: &str) -> PathBuf {
        self.component_dir(env_id, name, version).join(RUNS_DIRNAME)
    }

    /// Holds one materialized directory per logical mount name.
    pub fn mounts_dir(&self, env_id: Uuid, name: &str, version: &str) -> PathBuf {
        self.component_dir(env_id, name, version).join(MOUNTS_DIRNAME)
    }

    /// Scratch copy used while exporting an environment.
    pub fn export_staging_dir(&self, env_id: Uuid) -> PathBuf {
        self.temp_dir().join(env_id.to_string())
    }
}
