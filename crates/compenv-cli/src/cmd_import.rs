// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `compenv import` command.

use std::path::PathBuf;

use clap::Args;
use compenv::{Config, Layout};
use miette::Result;

/// Import an environment from an archive
#[derive(Debug, Args)]
pub struct CmdImport {
    /// Archive produced by 'compenv export'
    file: PathBuf,

    /// Make the imported environment current
    #[clap(long = "use")]
    switch: bool,
}

impl CmdImport {
    pub fn run(&mut self, layout: &Layout) -> Result<i32> {
        let id = crate::manager(layout).import(&self.file)?;

        if self.switch {
            let mut config = Config::load_or_init(layout)?;
            config.set_current_environment(layout, id)?;
        }

        println!("Imported environment {id}");
        Ok(0)
    }
}
