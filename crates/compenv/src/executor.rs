// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Execution adapter: launches containerized jobs and manages their images.

use std::collections::BTreeMap;
use std::process::{Command, Output};

use crate::mount::MountMap;
use crate::Error;

#[cfg(test)]
#[path = "./executor_test.rs"]
mod executor_test;

/// Everything needed to launch one containerized job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
    pub image: String,
    /// Entry point inside the container; the image default when empty.
    pub command: String,
    pub args: Vec<String>,
    /// Working directory inside the container; the image default when empty.
    pub work_directory: String,
    /// Logical mount name to host directory.
    pub mounts: MountMap,
    pub envs: BTreeMap<String, String>,
}

/// Output captured from a finished backend process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Combined stdout and stderr.
    pub output: String,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<Output> for Captured {
    fn from(out: Output) -> Self {
        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));
        Self {
            output,
            code: out.status.code(),
        }
    }
}

/// Abstracts the container backend so it can be swapped or faked.
///
/// Every call blocks until the backend process exits; no timeout is applied.
pub trait JobExecutor {
    /// Run a job to completion and capture its output.
    fn run_job(&self, job: &Job) -> crate::Result<Captured>;

    /// Whether the image is already available locally.
    fn image_pulled(&self, image: &str) -> crate::Result<bool>;

    /// Pull an image and capture the pull's output.
    fn pull_image(&self, image: &str) -> crate::Result<Captured>;
}

/// Runs jobs through the `docker` command line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
        }
    }
}

impl DockerCli {
    /// Use a different client binary, e.g. `podman`.
    pub fn with_program<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn output(&self, args: &[String]) -> crate::Result<Output> {
        tracing::debug!(program = %self.program, ?args, "invoking container backend");
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| Error::BackendUnavailable {
                program: self.program.clone(),
                error: e,
            })
    }
}

/// Container path a logical mount is bound to.
pub fn container_mount_path(mount_name: &str) -> String {
    format!("/{}", mount_name.trim_start_matches('/'))
}

/// Arguments for `docker` that launch `job`.
pub fn docker_run_args(job: &Job) -> Vec<String> {
    let mut args = vec!["run".to_string(), "--rm".to_string()];
    if !job.work_directory.is_empty() {
        args.push("-w".to_string());
        args.push(job.work_directory.clone());
    }
    for (name, host) in &job.mounts {
        args.push("-v".to_string());
        args.push(format!("{}:{}", host.display(), container_mount_path(name)));
    }
    for (key, value) in &job.envs {
        args.push("-e".to_string());
        args.push(format!("{key}={value}"));
    }
    if !job.command.is_empty() {
        args.push("--entrypoint".to_string());
        args.push(job.command.clone());
    }
    args.push(job.image.clone());
    args.extend(job.args.iter().cloned());
    args
}

impl JobExecutor for DockerCli {
    fn run_job(&self, job: &Job) -> crate::Result<Captured> {
        tracing::info!(image = %job.image, command = %job.command, "running job");
        let out = self.output(&docker_run_args(job))?;
        Ok(out.into())
    }

    fn image_pulled(&self, image: &str) -> crate::Result<bool> {
        let args = ["image", "inspect", image].map(String::from);
        let out = self.output(&args)?;
        Ok(out.status.success())
    }

    fn pull_image(&self, image: &str) -> crate::Result<Captured> {
        tracing::info!(%image, "pulling image");
        let args = ["pull", image].map(String::from);
        let out = self.output(&args)?;
        Ok(out.into())
    }
}
