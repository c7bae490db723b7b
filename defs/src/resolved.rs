use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ParameterType;

/// Where a resolved parameter got its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    Environment,
    SavedConfig,
    ParameterFile,
    SchemaDefault,
    Prompted,
    Skipped,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Environment => "environment variable",
            SourceKind::SavedConfig => "saved config",
            SourceKind::ParameterFile => "parameters file",
            SourceKind::SchemaDefault => "schema default",
            SourceKind::Prompted => "prompt",
            SourceKind::Skipped => "skipped",
        };
        f.write_str(name)
    }
}

/// Answer of a single source lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// The source has no opinion.
    Absent,
    /// Resolve to no value and do not prompt.
    ExplicitSkip,
    /// Untyped literal that still has to be coerced.
    Text(String),
    /// Value stored in its declared type already.
    Typed(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    /// `None` only when `source` is `Skipped`.
    pub value: Option<Value>,
    pub source: SourceKind,
}

impl ResolvedParameter {
    pub fn new(name: &str, param_type: ParameterType, value: Value, source: SourceKind) -> Self {
        ResolvedParameter {
            name: name.to_string(),
            param_type,
            value: Some(value),
            source,
        }
    }

    pub fn skipped(name: &str, param_type: ParameterType) -> Self {
        ResolvedParameter {
            name: name.to_string(),
            param_type,
            value: None,
            source: SourceKind::Skipped,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.source == SourceKind::Skipped
    }
}
