// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Installed component versions and the backends that execute them.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::executor::{Captured, Job, JobExecutor};
use crate::layout::Layout;
use crate::mount::{self, MountMap};
use crate::{Error, LOG_EXTENSION};

#[cfg(test)]
#[path = "./component_test.rs"]
mod component_test;

/// Timestamp used to name log files in a component's runs directory.
const LOG_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S%.3f";

/// A named command a component version can run.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct InstalledComponentCommand {
    /// Selector used by `run`.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Executable entry point inside the job.
    #[serde(default)]
    pub command: String,

    /// Environment variables; values may contain substitution placeholders.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub envs: BTreeMap<String, String>,

    /// Arguments; may contain substitution placeholders.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// Container image backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DockerBackend {
    pub image: String,

    #[serde(default, rename = "workdir")]
    pub work_directory: String,
}

/// Execution backend of a component version, selected by the `type` field.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Backend {
    Docker(DockerBackend),
    /// Any backend type this build cannot execute.
    #[serde(other)]
    Unsupported,
}

impl Backend {
    pub fn runnable(&self) -> Option<&dyn Runnable> {
        match self {
            Self::Docker(docker) => Some(docker),
            Self::Unsupported => None,
        }
    }

    pub fn downloadable(&self) -> Option<&dyn Downloadable> {
        match self {
            Self::Docker(docker) => Some(docker),
            Self::Unsupported => None,
        }
    }
}

/// A single run of one command, fully resolved against an environment.
pub struct Invocation<'a> {
    pub command: &'a InstalledComponentCommand,
    pub mounts: MountMap,
    pub runs_dir: &'a Path,
    /// Applied once to every argument and environment value.
    pub processor: &'a dyn Fn(&str) -> String,
}

/// Backends able to execute component commands.
pub trait Runnable {
    fn run(&self, executor: &dyn JobExecutor, invocation: Invocation<'_>) -> crate::Result<()>;
}

/// Backends with artifacts that must be fetched before the first run.
pub trait Downloadable {
    fn download(&self, executor: &dyn JobExecutor, runs_dir: &Path) -> crate::Result<()>;
}

impl Runnable for DockerBackend {
    fn run(&self, executor: &dyn JobExecutor, invocation: Invocation<'_>) -> crate::Result<()> {
        let Invocation {
            command,
            mounts,
            runs_dir,
            processor,
        } = invocation;

        mount::materialize(&mounts)?;

        let job = Job {
            image: self.image.clone(),
            command: command.command.clone(),
            args: command.args.iter().map(|a| processor(a.as_str())).collect(),
            work_directory: self.work_directory.clone(),
            mounts,
            envs: command
                .envs
                .iter()
                .map(|(k, v)| (k.clone(), processor(v.as_str())))
                .collect(),
        };

        let captured = executor.run_job(&job)?;
        write_run_log(runs_dir, &captured.output)?;
        self.check(&captured)
    }
}

impl Downloadable for DockerBackend {
    fn download(&self, executor: &dyn JobExecutor, runs_dir: &Path) -> crate::Result<()> {
        if executor.image_pulled(&self.image)? {
            tracing::debug!(image = %self.image, "image already present");
            return Ok(());
        }
        let captured = executor.pull_image(&self.image)?;
        write_run_log(runs_dir, &captured.output)?;
        self.check(&captured)
    }
}

impl DockerBackend {
    fn check(&self, captured: &Captured) -> crate::Result<()> {
        if captured.success() {
            Ok(())
        } else {
            Err(Error::JobFailed {
                image: self.image.clone(),
                code: captured.code,
            })
        }
    }
}

/// One version of a component installed into an environment.
///
/// The owning environment is not recorded here; callers pass its id.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct InstalledComponentVersion {
    pub name: String,

    pub version: String,

    #[serde(flatten)]
    pub backend: Backend,

    /// Logical mount names the component expects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<String>,

    /// Logical name mapped to the environment's shared directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<String>,

    #[serde(default)]
    pub commands: Vec<InstalledComponentCommand>,
}

impl InstalledComponentVersion {
    /// Load a component definition from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;
        serde_yaml::from_str(&yaml).map_err(|e| Error::InvalidYaml {
            path: path.to_path_buf(),
            error: e,
        })
    }

    /// Mount map for this component inside `env_id`.
    pub fn mounts(&self, layout: &Layout, env_id: Uuid) -> MountMap {
        mount::resolve_mounts(
            &self.mounts,
            self.shared.as_deref(),
            &layout.mounts_dir(env_id, &self.name, &self.version),
            &layout.shared_dir(env_id),
        )
    }

    pub fn command(&self, name: &str) -> Option<&InstalledComponentCommand> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Fetch whatever the backend needs before running. No-op for backends
    /// without downloadable artifacts.
    pub fn download(
        &self,
        executor: &dyn JobExecutor,
        layout: &Layout,
        env_id: Uuid,
    ) -> crate::Result<()> {
        match self.backend.downloadable() {
            Some(backend) => {
                backend.download(executor, &layout.runs_dir(env_id, &self.name, &self.version))
            }
            None => Ok(()),
        }
    }

    /// Run the first command named `command_name`.
    pub fn run(
        &self,
        executor: &dyn JobExecutor,
        layout: &Layout,
        env_id: Uuid,
        command_name: &str,
        processor: &dyn Fn(&str) -> String,
    ) -> crate::Result<()> {
        let backend = self
            .backend
            .runnable()
            .ok_or_else(|| self.nothing_to_run(command_name))?;
        let mounts = self.mounts(layout, env_id);
        let command = self
            .command(command_name)
            .ok_or_else(|| self.nothing_to_run(command_name))?;
        let runs_dir = layout.runs_dir(env_id, &self.name, &self.version);

        tracing::info!(component = %self.name, version = %self.version, command = %command_name, "running command");
        backend.run(
            executor,
            Invocation {
                command,
                mounts,
                runs_dir: &runs_dir,
                processor,
            },
        )
    }

    fn nothing_to_run(&self, command_name: &str) -> Error {
        Error::NothingToRun {
            component: self.name.clone(),
            version: self.version.clone(),
            command: command_name.to_string(),
        }
    }
}

/// Write `output` to a new timestamped log file under `runs_dir`.
///
/// Existing logs are never replaced; a name already taken within the same
/// millisecond gets a `-1`, `-2`, ... suffix.
pub fn write_run_log(runs_dir: &Path, output: &str) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(runs_dir).map_err(|e| Error::WriteFailed {
        path: runs_dir.to_path_buf(),
        error: e,
    })?;
    let stamp = chrono::Local::now().format(LOG_TIMESTAMP_FORMAT).to_string();
    let mut attempt = 0usize;
    loop {
        let name = match attempt {
            0 => format!("{stamp}.{LOG_EXTENSION}"),
            n => format!("{stamp}-{n}.{LOG_EXTENSION}"),
        };
        let path = runs_dir.join(name);
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path);
        match file {
            Ok(mut file) => {
                file.write_all(output.as_bytes())
                    .map_err(|e| Error::WriteFailed {
                        path: path.clone(),
                        error: e,
                    })?;
                tracing::debug!(log = %path.display(), "wrote run log");
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(Error::WriteFailed { path, error: e }),
        }
    }
}
