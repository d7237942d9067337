// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! compenv - Versioned Component Environments
//!
//! This crate provides the core library for managing isolated environments
//! into which versioned components are installed and then executed as
//! containerized jobs.
//!
//! # Overview
//!
//! Every environment is a UUID-named directory holding a `config.yaml`
//! record, a `shared` directory visible to all of its components, and one
//! `<name>/<version>` directory per installed component with `runs` (logs)
//! and `mounts` (job data) children. Environments can be exported to a
//! single archive and imported elsewhere under the same id.
//!
//! # Example
//!
//! ```yaml
//! # <root>/environments/<uuid>/config.yaml
//! api: compenv/v0
//! name: staging
//! uuid: 6f1c2a0e-3c1b-4d0a-9d8e-2f4b5a6c7d8e
//!
//! installed:
//!   - name: azbi
//!     version: 0.1.0
//!     type: docker
//!     image: registry.local/azbi:0.1.0
//!     workdir: /workdir
//!     mounts:
//!       - data
//!     shared: shared
//!     commands:
//!       - name: init
//!         description: initialize module state
//!         command: /bin/init
//!         args:
//!           - --name=${ENVIRONMENT_NAME}
//! ```

pub mod archive;
pub mod component;
pub mod config;
pub mod environment;
pub mod error;
pub mod executor;
pub mod layout;
pub mod manager;
pub mod mount;
pub mod variables;

#[cfg(test)]
mod fixtures;

pub use archive::{ArchiveTransport, TarGz};
pub use component::{
    Backend, DockerBackend, InstalledComponentCommand, InstalledComponentVersion,
};
pub use config::Config;
pub use environment::{Environment, SshConfig};
pub use error::{Error, Result};
pub use executor::{Captured, DockerCli, Job, JobExecutor};
pub use layout::Layout;
pub use manager::Manager;
pub use mount::MountMap;
pub use variables::{parse_assignment, VariableProcessor};

/// Directory under the root holding one directory per environment.
pub const ENVIRONMENTS_DIRNAME: &str = "environments";

/// Scratch directory under the root.
pub const TEMP_DIRNAME: &str = "tmp";

/// Root-level settings file.
pub const SETTINGS_FILENAME: &str = "config.yaml";

/// Environment record inside each environment directory.
pub const ENV_CONFIG_FILENAME: &str = "config.yaml";

pub const SHARED_DIRNAME: &str = "shared";
pub const RUNS_DIRNAME: &str = "runs";
pub const MOUNTS_DIRNAME: &str = "mounts";

/// Extension of captured job output files, never exported.
pub const LOG_EXTENSION: &str = "log";
