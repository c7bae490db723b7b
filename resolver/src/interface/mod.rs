mod memory_store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use param_defs::{LocatorError, ParameterSchema};
use serde_json::Value;

pub use memory_store::MemoryConfigStore;

/// Finds the project root a provisioning run belongs to.
#[cfg_attr(test, mockall::automock)]
pub trait ProjectLocator {
    fn locate(&self, cwd: &Path) -> Result<PathBuf, LocatorError>;
}

/// Per-environment store of parameter values saved after earlier prompts.
///
/// Values are stored already typed. The resolver only ever reads; `set` and
/// `unset` belong to whoever owns the prompt.
#[cfg_attr(test, mockall::automock)]
pub trait SavedConfigStore {
    fn get(&self, environment: &str, parameter: &str) -> Option<Value>;
    fn set(&self, environment: &str, parameter: &str, value: &Value) -> Result<(), anyhow::Error>;
    fn unset(&self, environment: &str, parameter: &str) -> Result<(), anyhow::Error>;
    fn list(&self, environment: &str) -> BTreeMap<String, Value>;
}

/// Reads a parameters document into `name -> value` as written in the file.
#[cfg_attr(test, mockall::automock)]
pub trait ParameterFileLoader {
    fn load(&self, path: &Path) -> Result<BTreeMap<String, Value>, anyhow::Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome {
    Value(Value),
    Cancelled,
}

/// Asks a human for a parameter value. Implementations validate input with
/// the same coercion rules the resolver uses before returning a value.
#[cfg_attr(test, mockall::automock)]
pub trait InteractivePrompter {
    fn ask(&self, schema: &ParameterSchema) -> Result<PromptOutcome, anyhow::Error>;
}
