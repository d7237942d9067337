// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Environment records and their persistence as `config.yaml` files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::component::InstalledComponentVersion;
use crate::layout::Layout;
use crate::Error;

#[cfg(test)]
#[path = "./environment_test.rs"]
mod environment_test;

/// API version for environment records.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "compenv/v0")]
    V0,
}

/// Helper for two-stage deserialization to determine API version first.
#[derive(Deserialize)]
struct ApiVersionMapping {
    #[serde(default)]
    api: ApiVersion,
}

/// SSH keypair material associated with an environment. Carried as-is.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SshConfig {
    #[serde(default)]
    pub public_key: String,

    #[serde(default)]
    pub private_key: String,
}

/// A named, UUID-identified workspace of installed component versions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Environment {
    #[serde(default)]
    pub api: ApiVersion,

    /// Human label, not unique.
    pub name: String,

    /// Primary identity. Never nil once persisted.
    #[serde(rename = "uuid")]
    pub id: Uuid,

    /// Installed component versions in installation order.
    #[serde(default)]
    pub installed: Vec<InstalledComponentVersion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh: Option<SshConfig>,
}

impl Environment {
    /// A new, empty environment with a fresh random id.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            api: ApiVersion::default(),
            name: name.into(),
            id: Uuid::new_v4(),
            installed: Vec::new(),
            ssh: None,
        }
    }

    /// Parse a record from YAML; `source` names its origin in errors.
    pub fn from_yaml<S: AsRef<str>>(yaml: S, source: &Path) -> crate::Result<Self> {
        let invalid = |error: serde_yaml::Error| Error::InvalidYaml {
            path: source.to_path_buf(),
            error,
        };

        // Stage 1: Parse to get API version
        let value: serde_yaml::Value = serde_yaml::from_str(yaml.as_ref()).map_err(invalid)?;
        let with_version: ApiVersionMapping =
            serde_yaml::from_value(value.clone()).map_err(invalid)?;

        // Stage 2: Deserialize based on version
        match with_version.api {
            ApiVersion::V0 => serde_yaml::from_value(value).map_err(invalid),
        }
    }

    /// Load a record from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;
        Self::from_yaml(yaml, path)
    }

    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the record into its (existing) environment directory.
    pub fn save(&self, layout: &Layout) -> crate::Result<()> {
        if self.id.is_nil() {
            return Err(Error::NilEnvironmentId);
        }
        let path = layout.environment_config(self.id);
        let yaml = self.to_yaml()?;
        std::fs::write(&path, yaml).map_err(|e| Error::WriteFailed {
            path: path.clone(),
            error: e,
        })?;
        tracing::debug!(env = %self.id, path = %path.display(), "saved environment");
        Ok(())
    }

    /// Whether a record for `id` is on disk.
    pub fn exists(layout: &Layout, id: Uuid) -> bool {
        layout.environment_config(id).is_file()
    }

    /// Read the record for `id`.
    pub fn get(layout: &Layout, id: Uuid) -> crate::Result<Self> {
        let path = layout.environment_config(id);
        if !path.is_file() {
            return Err(Error::EnvironmentNotFound(id));
        }
        let env = Self::load(&path)?;
        if env.id != id {
            return Err(Error::IdMismatch {
                dir: layout.environment_dir(id),
                found: env.id,
            });
        }
        Ok(env)
    }

    /// Read every environment under the layout's environments directory.
    ///
    /// Entries that are not UUID-named directories are skipped.
    pub fn get_all(layout: &Layout) -> crate::Result<Vec<Self>> {
        let dir = layout.environments_dir();
        let entries = std::fs::read_dir(&dir).map_err(|e| Error::ReadFailed {
            path: dir.clone(),
            error: e,
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let id = name
                .to_str()
                .and_then(|n| Uuid::parse_str(n).ok().filter(|id| id.to_string() == n));
            match id {
                Some(id) => ids.push(id),
                None => tracing::warn!(entry = ?name, "skipping non-environment directory"),
            }
        }
        ids.sort();

        ids.into_iter().map(|id| Self::get(layout, id)).collect()
    }

    /// True if this exact name and version is already installed.
    pub fn is_installed(&self, name: &str, version: &str) -> bool {
        self.installed
            .iter()
            .any(|c| c.name == name && c.version == version)
    }

    /// The first installed component named `name`.
    pub fn component(&self, name: &str) -> crate::Result<&InstalledComponentVersion> {
        self.installed
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::ComponentNotFound(name.to_string()))
    }
}
