// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use rstest::rstest;
use tempfile::TempDir;
use uuid::Uuid;

use super::*;

const ENV_ID: &str = "6f1c2a0e-3c1b-4d0a-9d8e-2f4b5a6c7d8e";

fn env_id() -> Uuid {
    Uuid::parse_str(ENV_ID).unwrap()
}

#[rstest]
fn test_environment_paths() {
    let layout = Layout::new("/cfg");

    assert_eq!(layout.environments_dir(), PathBuf::from("/cfg/environments"));
    assert_eq!(
        layout.environment_dir(env_id()),
        PathBuf::from(format!("/cfg/environments/{ENV_ID}"))
    );
    assert_eq!(
        layout.environment_config(env_id()),
        PathBuf::from(format!("/cfg/environments/{ENV_ID}/config.yaml"))
    );
    assert_eq!(
        layout.shared_dir(env_id()),
        PathBuf::from(format!("/cfg/environments/{ENV_ID}/shared"))
    );
}

#[rstest]
fn test_component_paths() {
    let layout = Layout::new("/cfg");

    assert_eq!(
        layout.runs_dir(env_id(), "azbi", "0.1.0"),
        PathBuf::from(format!("/cfg/environments/{ENV_ID}/azbi/0.1.0/runs"))
    );
    assert_eq!(
        layout.mounts_dir(env_id(), "azbi", "0.1.0"),
        PathBuf::from(format!("/cfg/environments/{ENV_ID}/azbi/0.1.0/mounts"))
    );
}

#[rstest]
fn test_export_staging_is_outside_environments() {
    let layout = Layout::new("/cfg");
    let staging = layout.export_staging_dir(env_id());

    assert_eq!(staging, PathBuf::from(format!("/cfg/tmp/{ENV_ID}")));
    assert!(!staging.starts_with(layout.environments_dir()));
}

#[rstest]
fn test_paths_have_no_side_effects() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path().join("root"));

    let _ = layout.runs_dir(env_id(), "c", "1");
    assert!(!tmp.path().join("root").exists());
}

#[rstest]
fn test_ensure_creates_setup_directories() {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path().join("root")).ensure().unwrap();

    assert!(layout.environments_dir().is_dir());
    assert!(layout.temp_dir().is_dir());
    assert!(layout.root().is_absolute());
}
