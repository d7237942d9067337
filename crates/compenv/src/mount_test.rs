// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use rstest::rstest;

use super::*;

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[rstest]
fn test_mounts_resolve_under_mounts_dir() {
    let resolved = resolve_mounts(
        &names(&["data", "state"]),
        None,
        Path::new("/env/c/1/mounts"),
        Path::new("/env/shared"),
    );

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved["data"], PathBuf::from("/env/c/1/mounts/data"));
    assert_eq!(resolved["state"], PathBuf::from("/env/c/1/mounts/state"));
}

#[rstest]
fn test_shared_adds_entry() {
    let resolved = resolve_mounts(
        &names(&["data"]),
        Some("exchange"),
        Path::new("/env/c/1/mounts"),
        Path::new("/env/shared"),
    );

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved["exchange"], PathBuf::from("/env/shared"));
}

#[rstest]
fn test_shared_overrides_same_named_mount() {
    let resolved = resolve_mounts(
        &names(&["data"]),
        Some("data"),
        Path::new("/env/c/1/mounts"),
        Path::new("/env/shared"),
    );

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved["data"], PathBuf::from("/env/shared"));
}

#[rstest]
fn test_materialize_creates_directories() {
    let tmp = tempfile::TempDir::new().unwrap();
    let resolved = resolve_mounts(
        &names(&["a", "b"]),
        Some("s"),
        &tmp.path().join("mounts"),
        &tmp.path().join("shared"),
    );

    materialize(&resolved).unwrap();

    for dir in resolved.values() {
        assert!(dir.is_dir(), "{} should exist", dir.display());
    }
}
