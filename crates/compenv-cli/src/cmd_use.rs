// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `compenv use` command.

use clap::Args;
use compenv::{Config, Layout};
use miette::Result;
use uuid::Uuid;

/// Select the current environment
#[derive(Debug, Args)]
pub struct CmdUse {
    /// Id of an existing environment
    id: Uuid,
}

impl CmdUse {
    pub fn run(&mut self, layout: &Layout) -> Result<i32> {
        let mut config = Config::load_or_init(layout)?;
        config.set_current_environment(layout, self.id)?;
        println!("Using environment {}", self.id);
        Ok(0)
    }
}
