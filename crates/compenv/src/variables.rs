// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Variable substitution applied to command arguments and environment values.

use std::collections::BTreeMap;

#[cfg(test)]
#[path = "./variables_test.rs"]
mod variables_test;

/// Variable naming the id of the environment a job runs in.
pub const ENVIRONMENT_ID_VAR: &str = "ENVIRONMENT_ID";

/// Variable naming the environment a job runs in.
pub const ENVIRONMENT_NAME_VAR: &str = "ENVIRONMENT_NAME";

/// Variable holding the host path of the environment's shared directory.
pub const SHARED_DIR_VAR: &str = "SHARED_DIR";

/// A processor that returns its input unchanged.
pub fn identity(raw: &str) -> String {
    raw.to_string()
}

/// Expands `$NAME` and `${NAME}` references in a single pass.
///
/// Names are looked up in the processor's own variables first and then in
/// the process environment. Unknown references are left as written.
#[derive(Debug, Clone, Default)]
pub struct VariableProcessor {
    vars: BTreeMap<String, String>,
    use_process_env: bool,
}

impl VariableProcessor {
    pub fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
            use_process_env: true,
        }
    }

    /// A processor that never consults the process environment.
    pub fn isolated() -> Self {
        Self::default()
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    fn lookup(&self, name: &str) -> Option<String> {
        if let Some(value) = self.vars.get(name) {
            return Some(value.clone());
        }
        if self.use_process_env {
            return std::env::var(name).ok();
        }
        None
    }

    pub fn process(&self, raw: &str) -> String {
        shellexpand::env_with_context_no_errors(raw, |name| self.lookup(name)).into_owned()
    }
}

/// Parse a `KEY=VALUE` assignment.
pub fn parse_assignment(raw: &str) -> crate::Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(crate::Error::ValidationFailed(format!(
            "Invalid variable '{raw}', expected KEY=VALUE"
        ))),
    }
}
