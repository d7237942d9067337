// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `compenv info` command.

use clap::Args;
use colored::Colorize;
use compenv::{Backend, Environment, Layout};
use miette::{IntoDiagnostic, Result};

/// Show the current environment and its components
#[derive(Debug, Args)]
pub struct CmdInfo {
    /// Print the raw environment record instead of a summary
    #[clap(long)]
    yaml: bool,
}

impl CmdInfo {
    pub fn run(&mut self, layout: &Layout) -> Result<i32> {
        let env = crate::current_environment(layout)?;

        if self.yaml {
            print!("{}", serde_yaml::to_string(&env).into_diagnostic()?);
        } else {
            self.show_table(layout, &env);
        }

        Ok(0)
    }

    fn show_table(&self, layout: &Layout, env: &Environment) {
        println!("{} {}", "Environment:".bold(), env.name.cyan());
        println!("  id:     {}", env.id);
        println!("  shared: {}", layout.shared_dir(env.id).display());
        if env.ssh.is_some() {
            println!("  ssh:    {}", "configured".green());
        }
        println!();

        println!("{}", "Installed Components:".bold());
        println!();

        if env.installed.is_empty() {
            println!("  {}", "(no components)".dimmed());
        }
        for (i, component) in env.installed.iter().enumerate() {
            let backend = match &component.backend {
                Backend::Docker(docker) => docker.image.green(),
                Backend::Unsupported => "unsupported backend".yellow(),
            };
            println!(
                "  {}. {} {} [{}]",
                i + 1,
                component.name.cyan(),
                component.version,
                backend
            );
            for command in &component.commands {
                if command.description.is_empty() {
                    println!("       - {}", command.name);
                } else {
                    println!(
                        "       - {}  {}",
                        command.name,
                        command.description.dimmed()
                    );
                }
            }
        }

        println!();
        println!("Total: {} component(s)", env.installed.len());
    }
}
