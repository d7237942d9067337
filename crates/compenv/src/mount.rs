// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Resolution of a component's logical mounts to host directories.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::Error;

#[cfg(test)]
#[path = "./mount_test.rs"]
mod mount_test;

/// Logical mount name to the host directory backing it.
pub type MountMap = BTreeMap<String, PathBuf>;

/// Map every declared mount to `<mounts_dir>/<mount>`, then the `shared`
/// name, if any, to the environment's shared directory.
///
/// The shared entry is applied last and replaces a same-named mount.
pub fn resolve_mounts(
    mounts: &[String],
    shared: Option<&str>,
    mounts_dir: &Path,
    shared_dir: &Path,
) -> MountMap {
    let mut resolved: MountMap = mounts
        .iter()
        .map(|name| (name.clone(), mounts_dir.join(name)))
        .collect();

    if let Some(name) = shared {
        resolved.insert(name.to_string(), shared_dir.to_path_buf());
    }

    resolved
}

/// Create every directory in the mount map.
pub fn materialize(mounts: &MountMap) -> crate::Result<()> {
    for (name, dir) in mounts {
        tracing::debug!(mount = %name, dir = %dir.display(), "ensuring mount directory");
        std::fs::create_dir_all(dir).map_err(|e| Error::WriteFailed {
            path: dir.clone(),
            error: e,
        })?;
    }
    Ok(())
}
