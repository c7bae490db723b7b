use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;

use param_defs::{get_env_var_name, ParameterSchema, RawValue, SourceKind};
use param_utils::to_literal;
use serde_json::Value;

use crate::interface::SavedConfigStore;

/// Snapshot of environment variables, consulted as `AZURE_PARAM_<NAME>`.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSource {
    vars: HashMap<String, String>,
}

impl EnvironmentSource {
    pub fn from_process() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Entries that are not valid UTF-8 cannot name a parameter and are dropped.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Unset is `Absent`, set to the empty string is `ExplicitSkip`.
    pub fn lookup(&self, parameter: &str) -> RawValue {
        match self.vars.get(&get_env_var_name(parameter)) {
            None => RawValue::Absent,
            Some(value) if value.is_empty() => RawValue::ExplicitSkip,
            Some(value) => RawValue::Text(value.clone()),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        EnvironmentSource {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Values persisted for one environment after earlier prompts.
pub struct SavedConfigSource<'a> {
    environment: String,
    store: &'a dyn SavedConfigStore,
}

impl<'a> SavedConfigSource<'a> {
    pub fn new(environment: &str, store: &'a dyn SavedConfigStore) -> Self {
        SavedConfigSource {
            environment: environment.to_string(),
            store,
        }
    }

    pub fn lookup(&self, parameter: &str) -> RawValue {
        match self.store.get(&self.environment, parameter) {
            Some(value) => RawValue::Typed(value),
            None => RawValue::Absent,
        }
    }
}

/// Values from the project's parameters document.
///
/// Strings and scalars are handed on as text and coerced like environment
/// values. Arrays and objects arrive already structured, so they are checked
/// against the declared type instead of being flattened into text.
#[derive(Debug, Clone, Default)]
pub struct ParameterFileSource {
    values: BTreeMap<String, Value>,
}

impl ParameterFileSource {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        ParameterFileSource { values }
    }

    pub fn lookup(&self, parameter: &str) -> RawValue {
        match self.values.get(parameter) {
            None => RawValue::Absent,
            Some(Value::String(literal)) => RawValue::Text(literal.clone()),
            Some(value @ (Value::Array(_) | Value::Object(_))) => RawValue::Typed(value.clone()),
            Some(value) => RawValue::Text(to_literal(value)),
        }
    }
}

/// One automated step of the precedence chain.
pub enum ValueSource<'r> {
    Environment(&'r EnvironmentSource),
    SavedConfig(&'r SavedConfigSource<'r>),
    ParameterFile(&'r ParameterFileSource),
    SchemaDefault,
}

impl ValueSource<'_> {
    pub fn kind(&self) -> SourceKind {
        match self {
            ValueSource::Environment(_) => SourceKind::Environment,
            ValueSource::SavedConfig(_) => SourceKind::SavedConfig,
            ValueSource::ParameterFile(_) => SourceKind::ParameterFile,
            ValueSource::SchemaDefault => SourceKind::SchemaDefault,
        }
    }

    pub fn lookup(&self, schema: &ParameterSchema) -> RawValue {
        match self {
            ValueSource::Environment(source) => source.lookup(&schema.name),
            ValueSource::SavedConfig(source) => source.lookup(&schema.name),
            ValueSource::ParameterFile(source) => source.lookup(&schema.name),
            ValueSource::SchemaDefault => match &schema.default {
                Some(default) => RawValue::Typed(default.clone()),
                None => RawValue::Absent,
            },
        }
    }
}
