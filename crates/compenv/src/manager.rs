// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Environment lifecycle: create, install, run, export and import.

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::archive::{ArchiveTransport, TarGz};
use crate::component::InstalledComponentVersion;
use crate::environment::{Environment, SshConfig};
use crate::executor::JobExecutor;
use crate::layout::Layout;
use crate::{Error, ENV_CONFIG_FILENAME, LOG_EXTENSION, SHARED_DIRNAME};

#[cfg(test)]
#[path = "./manager_test.rs"]
mod manager_test;

/// Owns the lifecycle of every environment under one [`Layout`].
///
/// Operations against the same environment must not run concurrently;
/// there is no locking and the last save wins.
pub struct Manager<X, A = TarGz> {
    layout: Layout,
    executor: X,
    archive: A,
}

impl<X: JobExecutor> Manager<X> {
    /// A manager exporting to gzip-compressed tar archives.
    pub fn new(layout: Layout, executor: X) -> Self {
        Self::with_archive(layout, executor, TarGz)
    }
}

impl<X: JobExecutor, A: ArchiveTransport> Manager<X, A> {
    pub fn with_archive(layout: Layout, executor: X, archive: A) -> Self {
        Self {
            layout,
            executor,
            archive,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Create and persist a new empty environment.
    pub fn create(&self, name: &str) -> crate::Result<Environment> {
        let env = Environment::new(name);
        for dir in [
            self.layout.environment_dir(env.id),
            self.layout.shared_dir(env.id),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| Error::WriteFailed {
                path: dir.clone(),
                error: e,
            })?;
        }
        env.save(&self.layout)?;
        tracing::info!(env = %env.id, name = %env.name, "created environment");
        Ok(env)
    }

    pub fn get(&self, id: Uuid) -> crate::Result<Environment> {
        Environment::get(&self.layout, id)
    }

    pub fn get_all(&self) -> crate::Result<Vec<Environment>> {
        Environment::get_all(&self.layout)
    }

    /// Install a component version and persist the environment.
    ///
    /// When the download fails the component stays appended in memory but
    /// nothing is saved; callers should reload the environment.
    pub fn install(
        &self,
        env: &mut Environment,
        component: InstalledComponentVersion,
    ) -> crate::Result<()> {
        check_component_paths(&component)?;
        if env.is_installed(&component.name, &component.version) {
            return Err(Error::DuplicateComponent {
                name: component.name,
                version: component.version,
            });
        }

        for dir in [
            self.layout
                .runs_dir(env.id, &component.name, &component.version),
            self.layout
                .mounts_dir(env.id, &component.name, &component.version),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| Error::WriteFailed {
                path: dir.clone(),
                error: e,
            })?;
        }

        env.installed.push(component);
        let installed = &env.installed[env.installed.len() - 1];
        self.download(env.id, installed)?;
        env.save(&self.layout)?;
        tracing::info!(
            env = %env.id,
            component = %installed.name,
            version = %installed.version,
            "installed component"
        );
        Ok(())
    }

    /// Fetch what `component` needs to run inside `env_id`.
    pub fn download(&self, env_id: Uuid, component: &InstalledComponentVersion) -> crate::Result<()> {
        component.download(&self.executor, &self.layout, env_id)
    }

    /// Run `command` of the first component named `component`.
    ///
    /// `processor` is applied once to every argument and environment value.
    pub fn run(
        &self,
        env: &Environment,
        component: &str,
        command: &str,
        processor: &dyn Fn(&str) -> String,
    ) -> crate::Result<()> {
        let installed = env.component(component)?;
        installed.run(&self.executor, &self.layout, env.id, command, processor)
    }

    /// Associate SSH material with the environment and persist it.
    pub fn set_ssh(&self, env: &mut Environment, ssh: SshConfig) -> crate::Result<()> {
        env.ssh = Some(ssh);
        env.save(&self.layout)
    }

    /// Pack the environment, minus log files, into `<dest_dir>/<id>.<ext>`.
    pub fn export(&self, env: &Environment, dest_dir: &Path) -> crate::Result<PathBuf> {
        let staging = self.layout.export_staging_dir(env.id);
        if staging.exists() {
            tracing::debug!(path = %staging.display(), "removing leftover export copy");
            std::fs::remove_dir_all(&staging)?;
        }

        let archive_path = dest_dir.join(format!("{}.{}", env.id, self.archive.extension()));
        let packed = self.stage_and_pack(env.id, &staging, dest_dir, &archive_path);

        let cleanup = match std::fs::remove_dir_all(&staging) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(Error::WriteFailed {
                path: staging.clone(),
                error: e,
            }),
            _ => Ok(()),
        };

        packed?;
        cleanup?;
        tracing::info!(env = %env.id, archive = %archive_path.display(), "exported environment");
        Ok(archive_path)
    }

    fn stage_and_pack(
        &self,
        env_id: Uuid,
        staging: &Path,
        dest_dir: &Path,
        archive_path: &Path,
    ) -> crate::Result<()> {
        copy_without_logs(&self.layout.environment_dir(env_id), staging)?;
        std::fs::create_dir_all(dest_dir).map_err(|e| Error::WriteFailed {
            path: dest_dir.to_path_buf(),
            error: e,
        })?;
        self.archive.pack(&[staging], archive_path)
    }

    /// Import an exported environment and download its components.
    ///
    /// Nothing is written unless the archive holds a valid record for an
    /// environment not yet present. Once extracted, a failed download is
    /// reported as [`Error::ImportIncomplete`] and the files stay in place.
    pub fn import(&self, source: &Path) -> crate::Result<Uuid> {
        let env = self.read_archived_environment(source)?;
        if Environment::exists(&self.layout, env.id) || self.layout.environment_dir(env.id).exists()
        {
            return Err(Error::AlreadyExists(env.id));
        }

        self.archive
            .extract(source, &self.layout.environments_dir())?;
        tracing::info!(env = %env.id, "extracted environment");

        for component in &env.installed {
            self.download(env.id, component)
                .map_err(|e| Error::ImportIncomplete {
                    id: env.id,
                    error: Box::new(e),
                })?;
        }
        Ok(env.id)
    }

    /// Locate and validate the environment record inside an archive.
    fn read_archived_environment(&self, source: &Path) -> crate::Result<Environment> {
        let mut root: Option<PathBuf> = None;
        let mut config: Option<(PathBuf, String)> = None;

        self.archive
            .walk(source, &mut |path: &Path, reader: &mut dyn Read| {
                let parts = normal_components(path);
                let Some(first) = parts.first() else {
                    return Ok(());
                };
                match &root {
                    Some(existing) if existing != first => {
                        return Err(Error::ValidationFailed(format!(
                            "archive holds more than one top-level directory: {} and {}",
                            existing.display(),
                            first.display()
                        )));
                    }
                    Some(_) => {}
                    None => root = Some(first.clone()),
                }
                if config.is_none() && parts.len() == 2 && parts[1] == Path::new(ENV_CONFIG_FILENAME)
                {
                    let mut yaml = String::new();
                    reader.read_to_string(&mut yaml)?;
                    config = Some((path.to_path_buf(), yaml));
                }
                Ok(())
            })?;

        let (config_path, yaml) =
            config.ok_or_else(|| Error::ConfigNotInArchive(source.to_path_buf()))?;
        let env = Environment::from_yaml(yaml, &source.join(&config_path))?;
        if env.id.is_nil() {
            return Err(Error::NilEnvironmentId);
        }
        for component in &env.installed {
            check_component_paths(component)?;
        }
        let dir = root.unwrap_or_default();
        if dir != Path::new(&env.id.to_string()) {
            return Err(Error::IdMismatch { dir, found: env.id });
        }
        Ok(env)
    }
}

/// Component names and versions become directories inside the environment,
/// so each must be one plain path segment that does not shadow the record
/// or the shared directory.
fn check_component_paths(component: &InstalledComponentVersion) -> crate::Result<()> {
    for segment in [&component.name, &component.version] {
        let path = Path::new(segment);
        let single = matches!(
            path.components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(part)] if *part == path.as_os_str()
        );
        if !single || segment == SHARED_DIRNAME || segment == ENV_CONFIG_FILENAME {
            return Err(Error::ValidationFailed(format!(
                "Invalid component path segment '{segment}' in {} {}",
                component.name, component.version
            )));
        }
    }
    Ok(())
}

fn normal_components(path: &Path) -> Vec<PathBuf> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(PathBuf::from(part)),
            _ => None,
        })
        .collect()
}

/// Matches on the file name suffix, so a bare `.log` counts too.
fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(&format!(".{LOG_EXTENSION}")))
}

/// Copy the tree at `src` to `dest`, leaving out log files.
fn copy_without_logs(src: &Path, dest: &Path) -> crate::Result<()> {
    for entry in walkdir::WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).map_err(|_| {
            Error::ValidationFailed(format!(
                "{} is not inside {}",
                entry.path().display(),
                src.display()
            ))
        })?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| Error::WriteFailed {
                path: target.clone(),
                error: e,
            })?;
        } else if is_log_file(entry.path()) {
            tracing::debug!(path = %entry.path().display(), "leaving log out of export");
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| Error::WriteFailed {
                path: target.clone(),
                error: e,
            })?;
        }
    }
    Ok(())
}
