// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `compenv run` command.

use clap::Args;
use compenv::variables::{ENVIRONMENT_ID_VAR, ENVIRONMENT_NAME_VAR, SHARED_DIR_VAR};
use compenv::{parse_assignment, Environment, Layout, VariableProcessor};
use miette::Result;

#[cfg(test)]
#[path = "./cmd_run_test.rs"]
mod cmd_run_test;

/// Run a component command in the current environment
#[derive(Debug, Args)]
pub struct CmdRun {
    /// Name of an installed component
    component: String,

    /// Name of the command to run
    command: String,

    /// Extra substitution variable (KEY=VALUE), may be repeated
    #[clap(long = "var", short = 'e')]
    vars: Vec<String>,
}

impl CmdRun {
    pub fn run(&mut self, layout: &Layout) -> Result<i32> {
        let env = crate::current_environment(layout)?;
        let processor = self.processor(layout, &env)?;

        crate::manager(layout).run(&env, &self.component, &self.command, &|raw: &str| {
            processor.process(raw)
        })?;

        Ok(0)
    }

    /// Substitutions describing `env`, overridden by `--var` values.
    fn processor(&self, layout: &Layout, env: &Environment) -> Result<VariableProcessor> {
        let mut processor = VariableProcessor::new();
        processor
            .set(ENVIRONMENT_ID_VAR, env.id.to_string())
            .set(ENVIRONMENT_NAME_VAR, env.name.as_str())
            .set(
                SHARED_DIR_VAR,
                layout.shared_dir(env.id).display().to_string(),
            );
        for raw in &self.vars {
            let (key, value) = parse_assignment(raw)?;
            processor.set(key, value);
        }
        Ok(processor)
    }
}
