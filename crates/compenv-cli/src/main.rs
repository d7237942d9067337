// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! compenv - Versioned Component Environment CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use compenv::{Config, DockerCli, Environment, Layout, Manager};
use miette::Result;

mod cmd_create;
mod cmd_export;
mod cmd_import;
mod cmd_info;
mod cmd_install;
mod cmd_list;
mod cmd_run;
mod cmd_use;

use cmd_create::CmdCreate;
use cmd_export::CmdExport;
use cmd_import::CmdImport;
use cmd_info::CmdInfo;
use cmd_install::CmdInstall;
use cmd_list::CmdList;
use cmd_run::CmdRun;
use cmd_use::CmdUse;

#[derive(Parser)]
#[clap(
    name = "compenv",
    about = "Versioned Component Environment Manager",
    version,
    long_about = "Install versioned components into isolated environments and run them as containerized jobs"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    /// Root directory holding settings and environments [default: ~/.compenv]
    #[clap(long, global = true, env = "COMPENV_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new environment and make it current
    Create(CmdCreate),

    /// List all environments
    List(CmdList),

    /// Select the current environment
    Use(CmdUse),

    /// Show the current environment and its components
    Info(CmdInfo),

    /// Install a component into the current environment
    Install(CmdInstall),

    /// Run a component command in the current environment
    Run(CmdRun),

    /// Export the current environment to an archive
    Export(CmdExport),

    /// Import an environment from an archive
    Import(CmdImport),
}

impl Opt {
    fn run(self) -> Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        let root = match self.config_dir {
            Some(dir) => dir,
            None => Layout::default_root()?,
        };
        let layout = Layout::new(root).ensure()?;

        // Dispatch to command
        match self.cmd {
            Command::Create(mut cmd) => cmd.run(&layout),
            Command::List(mut cmd) => cmd.run(&layout),
            Command::Use(mut cmd) => cmd.run(&layout),
            Command::Info(mut cmd) => cmd.run(&layout),
            Command::Install(mut cmd) => cmd.run(&layout),
            Command::Run(mut cmd) => cmd.run(&layout),
            Command::Export(mut cmd) => cmd.run(&layout),
            Command::Import(mut cmd) => cmd.run(&layout),
        }
    }
}

/// A manager running jobs through the local docker CLI.
pub fn manager(layout: &Layout) -> Manager<DockerCli> {
    Manager::new(layout.clone(), DockerCli::default())
}

/// The environment selected in the settings file.
pub fn current_environment(layout: &Layout) -> Result<Environment> {
    let config = Config::load_or_init(layout)?;
    match config.current(layout)? {
        Some(env) => Ok(env),
        None => Err(miette::miette!(
            help = "Run 'compenv create <name>' or 'compenv use <uuid>' first",
            "No current environment selected"
        )),
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}
