//! Environment abstractions for testability.
//!
//! Flags may fall back to environment variables. Lookups go through the
//! [`EnvReader`] trait so tests can supply a [`MockEnv`] instead of mutating
//! the process environment.

use std::collections::HashMap;

/// Abstraction over environment variables.
pub trait EnvReader {
    /// Get an environment variable value.
    ///
    /// A variable that is present with an empty value returns `Some("")`.
    fn var(&self, name: &str) -> Option<String>;

    /// Returns the first of `names` that is set, with its value.
    fn first_set<'n>(&self, names: &'n [String]) -> Option<(&'n str, String)> {
        names
            .iter()
            .find_map(|name| self.var(name).map(|value| (name.as_str(), value)))
    }
}

/// Real environment variable reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl EnvReader for RealEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }
}

/// Mock environment variable reader for testing.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: HashMap<String, String>,
}

impl MockEnv {
    /// Create an empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvReader for MockEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
