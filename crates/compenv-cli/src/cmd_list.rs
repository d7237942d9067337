// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `compenv list` command.

use clap::Args;
use colored::Colorize;
use compenv::{Config, Layout};
use miette::Result;

/// List all environments
#[derive(Debug, Args)]
pub struct CmdList {}

impl CmdList {
    pub fn run(&mut self, layout: &Layout) -> Result<i32> {
        let config = Config::load_or_init(layout)?;
        let envs = crate::manager(layout).get_all()?;

        if envs.is_empty() {
            println!("  {}", "(no environments)".dimmed());
            return Ok(0);
        }

        for env in &envs {
            let marker = if config.current_environment == Some(env.id) {
                "*".green().to_string()
            } else {
                " ".to_string()
            };
            println!(
                "{} {}  {}  {}",
                marker,
                env.id.to_string().cyan(),
                env.name,
                format!("[{} component(s)]", env.installed.len()).dimmed()
            );
        }

        Ok(0)
    }
}
