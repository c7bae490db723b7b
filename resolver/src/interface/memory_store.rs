use std::cell::RefCell;
use std::collections::BTreeMap;

use serde_json::Value;

use super::SavedConfigStore;

/// In-process `SavedConfigStore`, keyed by environment then parameter.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: RefCell<BTreeMap<String, BTreeMap<String, Value>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        MemoryConfigStore::default()
    }

    pub fn with_value(self, environment: &str, parameter: &str, value: Value) -> Self {
        self.values
            .borrow_mut()
            .entry(environment.to_string())
            .or_default()
            .insert(parameter.to_string(), value);
        self
    }
}

impl SavedConfigStore for MemoryConfigStore {
    fn get(&self, environment: &str, parameter: &str) -> Option<Value> {
        self.values
            .borrow()
            .get(environment)
            .and_then(|params| params.get(parameter))
            .cloned()
    }

    fn set(&self, environment: &str, parameter: &str, value: &Value) -> Result<(), anyhow::Error> {
        self.values
            .borrow_mut()
            .entry(environment.to_string())
            .or_default()
            .insert(parameter.to_string(), value.clone());
        Ok(())
    }

    fn unset(&self, environment: &str, parameter: &str) -> Result<(), anyhow::Error> {
        if let Some(params) = self.values.borrow_mut().get_mut(environment) {
            params.remove(parameter);
        }
        Ok(())
    }

    fn list(&self, environment: &str) -> BTreeMap<String, Value> {
        self.values
            .borrow()
            .get(environment)
            .cloned()
            .unwrap_or_default()
    }
}
