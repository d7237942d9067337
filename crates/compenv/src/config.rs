// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! The root-level settings file.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::environment::Environment;
use crate::layout::Layout;
use crate::Error;

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

/// Format version of the settings file.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ConfigVersion {
    #[default]
    #[serde(rename = "v1")]
    V1,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Kind {
    #[default]
    Config,
}

/// Settings shared by every command run against one root directory.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub version: ConfigVersion,

    #[serde(default)]
    pub kind: Kind,

    /// Environment that commands operate on when none is named.
    #[serde(
        default,
        rename = "current-environment",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_environment: Option<Uuid>,
}

impl Config {
    /// Read the settings file, writing a default one if there is none.
    pub fn load_or_init(layout: &Layout) -> crate::Result<Self> {
        let path = layout.settings_file();
        if !path.exists() {
            let config = Self::default();
            config.save(layout)?;
            tracing::debug!(path = %path.display(), "initialized settings");
            return Ok(config);
        }
        let yaml = std::fs::read_to_string(&path).map_err(|e| Error::ReadFailed {
            path: path.clone(),
            error: e,
        })?;
        serde_yaml::from_str(&yaml).map_err(|e| Error::InvalidYaml { path, error: e })
    }

    pub fn save(&self, layout: &Layout) -> crate::Result<()> {
        let path = layout.settings_file();
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(&path, yaml).map_err(|e| Error::WriteFailed { path, error: e })
    }

    /// Select `id` as the current environment and persist the choice.
    pub fn set_current_environment(&mut self, layout: &Layout, id: Uuid) -> crate::Result<()> {
        if !Environment::exists(layout, id) {
            return Err(Error::EnvironmentNotFound(id));
        }
        self.current_environment = Some(id);
        self.save(layout)?;
        tracing::info!(env = %id, "switched current environment");
        Ok(())
    }

    /// The current environment, if one was selected.
    pub fn current(&self, layout: &Layout) -> crate::Result<Option<Environment>> {
        self.current_environment
            .map(|id| Environment::get(layout, id))
            .transpose()
    }
}
