// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `compenv install` command.

use std::path::PathBuf;

use clap::Args;
use compenv::{InstalledComponentVersion, Layout};
use miette::Result;

/// Install a component into the current environment
#[derive(Debug, Args)]
pub struct CmdInstall {
    /// YAML file describing the component version
    file: PathBuf,
}

impl CmdInstall {
    pub fn run(&mut self, layout: &Layout) -> Result<i32> {
        let component = InstalledComponentVersion::load(&self.file)?;
        let mut env = crate::current_environment(layout)?;
        let (name, version) = (component.name.clone(), component.version.clone());

        crate::manager(layout).install(&mut env, component)?;

        println!("Installed {name} {version} into {}", env.name);
        Ok(0)
    }
}
