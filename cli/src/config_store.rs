use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use param_resolver::SavedConfigStore;
use param_utils::get_saved_config_path;
use serde_json::{Map, Value};

/// Saved parameter values of one environment, kept in
/// `.azure/<env>/config.json` under `infra.parameters.<name>`.
pub struct FileConfigStore {
    environment: String,
    path: PathBuf,
    document: RefCell<Value>,
}

impl FileConfigStore {
    pub fn open(project_root: &Path, environment: &str) -> Result<Self> {
        let path = get_saved_config_path(project_root, environment);
        let document = if path.is_file() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            log::debug!("No saved config at {}", path.display());
            Value::Object(Map::new())
        };

        Ok(FileConfigStore {
            environment: environment.to_string(),
            path,
            document: RefCell::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_environment(&self, environment: &str) -> Result<()> {
        if environment == self.environment {
            Ok(())
        } else {
            Err(anyhow!(
                "Config store for environment '{}' cannot write values of environment '{}'",
                self.environment,
                environment
            ))
        }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(&*self.document.borrow())?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

fn parameters_of(document: &Value) -> Option<&Map<String, Value>> {
    document.get("infra")?.get("parameters")?.as_object()
}

fn parameters_of_mut(document: &mut Value) -> Result<&mut Map<String, Value>> {
    let root = document
        .as_object_mut()
        .ok_or_else(|| anyhow!("Saved config is not a JSON object"))?;
    let infra = root
        .entry("infra")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| anyhow!("Saved config key 'infra' is not a JSON object"))?;
    infra
        .entry("parameters")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| anyhow!("Saved config key 'infra.parameters' is not a JSON object"))
}

impl SavedConfigStore for FileConfigStore {
    fn get(&self, environment: &str, parameter: &str) -> Option<Value> {
        if environment != self.environment {
            log::warn!(
                "Saved config of environment '{}' was asked for environment '{}'",
                self.environment,
                environment
            );
            return None;
        }
        parameters_of(&self.document.borrow())?.get(parameter).cloned()
    }

    fn set(&self, environment: &str, parameter: &str, value: &Value) -> Result<()> {
        self.check_environment(environment)?;
        parameters_of_mut(&mut self.document.borrow_mut())?
            .insert(parameter.to_string(), value.clone());
        self.save()
    }

    fn unset(&self, environment: &str, parameter: &str) -> Result<()> {
        self.check_environment(environment)?;
        let removed = parameters_of_mut(&mut self.document.borrow_mut())?.remove(parameter);
        if removed.is_none() {
            return Err(anyhow!(
                "No saved value for parameter '{}' in environment '{}'",
                parameter,
                environment
            ));
        }
        self.save()
    }

    fn list(&self, environment: &str) -> BTreeMap<String, Value> {
        if environment != self.environment {
            return BTreeMap::new();
        }
        parameters_of(&self.document.borrow())
            .map(|params| {
                params
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_set_persists_under_infra_parameters() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::open(temp_dir.path(), "dev").unwrap();
        assert_eq!(store.get("dev", "location"), None);

        store.set("dev", "location", &json!("westeurope")).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({"infra": {"parameters": {"location": "westeurope"}}})
        );

        let reopened = FileConfigStore::open(temp_dir.path(), "dev").unwrap();
        assert_eq!(reopened.get("dev", "location"), Some(json!("westeurope")));
        assert_eq!(reopened.list("dev").len(), 1);
    }

    #[test]
    fn test_keeps_unrelated_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = get_saved_config_path(temp_dir.path(), "dev");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"defaults": {"subscription": "abc"}}"#).unwrap();

        let store = FileConfigStore::open(temp_dir.path(), "dev").unwrap();
        store.set("dev", "instanceCount", &json!(3)).unwrap();
        store.unset("dev", "instanceCount").unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({"defaults": {"subscription": "abc"}, "infra": {"parameters": {}}})
        );
    }

    #[test]
    fn test_other_environment_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::open(temp_dir.path(), "dev").unwrap();
        assert!(store.set("prod", "location", &json!("eastus")).is_err());
        assert_eq!(store.get("prod", "location"), None);
    }

    #[test]
    fn test_corrupt_file_fails_to_open() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = get_saved_config_path(temp_dir.path(), "dev");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        assert!(FileConfigStore::open(temp_dir.path(), "dev").is_err());
    }
}
