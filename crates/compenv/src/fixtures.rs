// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Shared test fixtures: a recording job executor and sample components.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use crate::component::{
    Backend, DockerBackend, InstalledComponentCommand, InstalledComponentVersion,
};
use crate::executor::{Captured, Job, JobExecutor};

/// Records every call and answers with canned outcomes.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub pulled: Mutex<HashSet<String>>,
    pub pull_exit_code: Option<i32>,
    pub run_exit_code: Option<i32>,
    pub jobs: Mutex<Vec<Job>>,
    pub pulls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            pull_exit_code: Some(0),
            run_exit_code: Some(0),
            ..Default::default()
        }
    }

    /// Every pull exits with `code`.
    pub fn failing_pulls(code: i32) -> Self {
        Self {
            pull_exit_code: Some(code),
            ..Self::new()
        }
    }

    pub fn with_image(self, image: &str) -> Self {
        self.pulled.lock().unwrap().insert(image.to_string());
        self
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn pulls(&self) -> Vec<String> {
        self.pulls.lock().unwrap().clone()
    }
}

impl JobExecutor for RecordingExecutor {
    fn run_job(&self, job: &Job) -> crate::Result<Captured> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(Captured {
            output: format!("ran {}\n", job.image),
            code: self.run_exit_code,
        })
    }

    fn image_pulled(&self, image: &str) -> crate::Result<bool> {
        Ok(self.pulled.lock().unwrap().contains(image))
    }

    fn pull_image(&self, image: &str) -> crate::Result<Captured> {
        self.pulls.lock().unwrap().push(image.to_string());
        if self.pull_exit_code == Some(0) {
            self.pulled.lock().unwrap().insert(image.to_string());
        }
        Ok(Captured {
            output: format!("pulled {image}\n"),
            code: self.pull_exit_code,
        })
    }
}

pub fn command(name: &str, args: &[&str], envs: &[(&str, &str)]) -> InstalledComponentCommand {
    InstalledComponentCommand {
        name: name.to_string(),
        description: format!("{name} command"),
        command: format!("/bin/{name}"),
        envs: envs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}

pub fn docker_component(name: &str, version: &str) -> InstalledComponentVersion {
    InstalledComponentVersion {
        name: name.to_string(),
        version: version.to_string(),
        backend: Backend::Docker(DockerBackend {
            image: format!("registry.local/{name}:{version}"),
            work_directory: "/workdir".to_string(),
        }),
        mounts: vec!["data".to_string()],
        shared: Some("shared".to_string()),
        commands: vec![
            command("init", &["x"], &[("MODE", "y")]),
            command("apply", &["--auto"], &[]),
        ],
    }
}
