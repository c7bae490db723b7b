use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use param_resolver::ParameterFileLoader;
use param_utils::substitute_env_vars;
use serde_json::Value;

/// Loads an ARM-style parameters document:
///
/// ```json
/// { "parameters": { "location": { "value": "${AZURE_LOCATION}" } } }
/// ```
///
/// `${VAR}` placeholders are filled from the environment's `.env` values,
/// then from the process environment. Values are handed on as written;
/// the resolver decides how each one meets the declared type.
pub struct ArmParameterFileLoader {
    env_values: BTreeMap<String, String>,
}

impl ArmParameterFileLoader {
    pub fn new(env_values: BTreeMap<String, String>) -> Self {
        ArmParameterFileLoader { env_values }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        self.env_values
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    }

    pub fn parse(&self, contents: &str) -> Result<BTreeMap<String, Value>> {
        let substituted = substitute_env_vars(contents, |name| self.lookup(name));
        let document: Value =
            serde_json::from_str(&substituted).context("Parameters file is not valid JSON")?;

        let parameters = match document.get("parameters") {
            Some(Value::Object(parameters)) => parameters,
            Some(_) => return Err(anyhow!("'parameters' in parameters file must be an object")),
            None => return Ok(BTreeMap::new()),
        };

        let mut values = BTreeMap::new();
        for (name, entry) in parameters {
            let value = match entry.get("value") {
                Some(value) => value,
                None => {
                    if entry.get("reference").is_some() {
                        log::warn!(
                            "Parameter '{}' uses a Key Vault reference, which is passed through to the deployment and not resolved here",
                            name
                        );
                    } else {
                        log::warn!("Parameter '{}' in parameters file has no value", name);
                    }
                    continue;
                }
            };

            match value {
                Value::Null => continue,
                // A placeholder for an unset variable leaves an empty string.
                Value::String(literal) if literal.is_empty() => {
                    log::debug!("Parameter '{}' in parameters file is empty, ignoring it", name);
                    continue;
                }
                _ => {}
            }
            values.insert(name.clone(), value.clone());
        }

        Ok(values)
    }
}

impl ParameterFileLoader for ArmParameterFileLoader {
    fn load(&self, path: &Path) -> Result<BTreeMap<String, Value>> {
        log::debug!("Reading parameters file from {}", path.display());
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read parameters file {}", path.display()))?;
        self.parse(&contents)
            .with_context(|| format!("Failed to load parameters file {}", path.display()))
    }
}
