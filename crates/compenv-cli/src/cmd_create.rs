// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `compenv create` command.

use clap::Args;
use compenv::{Config, Layout};
use miette::Result;

/// Create a new environment and make it current
#[derive(Debug, Args)]
pub struct CmdCreate {
    /// Human readable name, need not be unique
    name: String,

    /// Keep the current environment selected
    #[clap(long)]
    no_switch: bool,
}

impl CmdCreate {
    pub fn run(&mut self, layout: &Layout) -> Result<i32> {
        let env = crate::manager(layout).create(&self.name)?;

        if !self.no_switch {
            let mut config = Config::load_or_init(layout)?;
            config.set_current_environment(layout, env.id)?;
        }

        println!("Created environment {} ({})", env.name, env.id);
        Ok(0)
    }
}
