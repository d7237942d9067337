// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for compenv operations.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use uuid::Uuid;

/// Convenience Result type with compenv Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during compenv operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Refused to persist an environment without an identity
    #[error("Environment id must not be the nil UUID")]
    #[diagnostic(code(compenv::nil_environment_id))]
    NilEnvironmentId,

    /// The environment record is not on disk
    #[error("Environment {0} not found")]
    #[diagnostic(
        code(compenv::environment_not_found),
        help("Run 'compenv list' to see the available environments")
    )]
    EnvironmentNotFound(Uuid),

    /// An environment with this id is already present
    #[error("Environment {0} already exists")]
    #[diagnostic(
        code(compenv::already_exists),
        help("Imports never overwrite or merge into an existing environment")
    )]
    AlreadyExists(Uuid),

    /// The record stored in a directory names a different environment
    #[error("Environment directory {dir:?} holds a record for {found}")]
    #[diagnostic(code(compenv::id_mismatch))]
    IdMismatch { dir: PathBuf, found: Uuid },

    /// Same component name and version installed twice
    #[error("Component {name} {version} is already installed in this environment")]
    #[diagnostic(code(compenv::duplicate_component))]
    DuplicateComponent { name: String, version: String },

    /// No installed component carries the requested name
    #[error("no such component installed: {0}")]
    #[diagnostic(
        code(compenv::component_not_found),
        help("Run 'compenv info' to list the installed components")
    )]
    ComponentNotFound(String),

    /// The component cannot run the requested command
    #[error("nothing to run for this version: {component} {version} ({command})")]
    #[diagnostic(code(compenv::nothing_to_run))]
    NothingToRun {
        component: String,
        version: String,
        command: String,
    },

    /// The containerized job exited unsuccessfully
    #[error("Job for image {image} failed with exit code {code:?}")]
    #[diagnostic(
        code(compenv::job_failed),
        help("The captured output was written to the component's runs directory")
    )]
    JobFailed { image: String, code: Option<i32> },

    /// The container backend could not be invoked at all
    #[error("Failed to invoke {program}")]
    #[diagnostic(
        code(compenv::backend_unavailable),
        help("Check that {program} is installed and on PATH")
    )]
    BackendUnavailable {
        program: String,
        #[source]
        error: std::io::Error,
    },

    /// An exported archive lacks the environment record
    #[error("No environment config.yaml found in archive {0:?}")]
    #[diagnostic(code(compenv::config_not_in_archive))]
    ConfigNotInArchive(PathBuf),

    /// Files were extracted but component images could not all be prepared
    #[error("Environment {id} was imported but is incomplete")]
    #[diagnostic(
        code(compenv::import_incomplete),
        help("The environment directory is already on disk; fix the cause and re-run the download")
    )]
    ImportIncomplete {
        id: Uuid,
        #[source]
        error: Box<Error>,
    },

    /// Invalid YAML in an environment or settings file
    #[error("Invalid YAML in {path:?}: {error}")]
    #[diagnostic(
        code(compenv::invalid_yaml),
        help("Check YAML syntax of the file")
    )]
    InvalidYaml {
        path: PathBuf,
        #[source]
        error: serde_yaml::Error,
    },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(compenv::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to write file
    #[error("Failed to write file: {path:?}")]
    #[diagnostic(code(compenv::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Validation error
    #[error("Validation failed: {0}")]
    #[diagnostic(code(compenv::validation_failed))]
    ValidationFailed(String),

    /// Directory walk error passthrough
    #[error(transparent)]
    #[diagnostic(code(compenv::walk_error))]
    Walk(#[from] walkdir::Error),

    /// YAML serialization error passthrough
    #[error(transparent)]
    #[diagnostic(code(compenv::yaml_error))]
    Yaml(#[from] serde_yaml::Error),

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(compenv::io_error))]
    Io(#[from] std::io::Error),
}
