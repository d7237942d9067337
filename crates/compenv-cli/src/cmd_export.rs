// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `compenv export` command.

use std::path::PathBuf;

use clap::Args;
use compenv::Layout;
use miette::Result;

/// Export the current environment to an archive
#[derive(Debug, Args)]
pub struct CmdExport {
    /// Directory to write the archive into
    #[clap(short, long, default_value = ".")]
    dest: PathBuf,
}

impl CmdExport {
    pub fn run(&mut self, layout: &Layout) -> Result<i32> {
        let env = crate::current_environment(layout)?;
        let archive = crate::manager(layout).export(&env, &self.dest)?;
        println!("Exported {} to {}", env.name, archive.display());
        Ok(0)
    }
}
