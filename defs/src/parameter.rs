use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ENV_VAR_PREFIX: &str = "AZURE_PARAM_";

/// Environment variable consulted for a parameter, e.g. `webAppName` -> `AZURE_PARAM_WEBAPPNAME`.
pub fn get_env_var_name(parameter_name: &str) -> String {
    format!("{}{}", ENV_VAR_PREFIX, parameter_name.to_uppercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ParameterType {
    String,
    Bool,
    Number,
    Array,
    Object,
}

impl ParameterType {
    /// Parses a declared type name, accepting the ARM/Bicep spellings as well.
    /// The second element is true for the `secure*` variants.
    pub fn from_type_name(type_name: &str) -> Option<(ParameterType, bool)> {
        match type_name.to_lowercase().as_str() {
            "string" => Some((ParameterType::String, false)),
            "securestring" => Some((ParameterType::String, true)),
            "bool" | "boolean" => Some((ParameterType::Bool, false)),
            "int" | "number" => Some((ParameterType::Number, false)),
            "array" => Some((ParameterType::Array, false)),
            "object" => Some((ParameterType::Object, false)),
            "secureobject" => Some((ParameterType::Object, true)),
            _ => None,
        }
    }

    /// True when the runtime shape of `value` is exactly this type.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ParameterType::String, Value::String(_))
                | (ParameterType::Bool, Value::Bool(_))
                | (ParameterType::Number, Value::Number(_))
                | (ParameterType::Array, Value::Array(_))
                | (ParameterType::Object, Value::Object(_))
        )
    }

    /// Name of the shape a JSON value actually has, used in fault messages.
    pub fn describe_value(value: &Value) -> &'static str {
        match value {
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Null => "null",
        }
    }
}

impl TryFrom<String> for ParameterType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ParameterType::from_type_name(&value)
            .map(|(param_type, _)| param_type)
            .ok_or_else(|| format!("unknown parameter type '{}'", value))
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterType::String => "string",
            ParameterType::Bool => "bool",
            ParameterType::Number => "number",
            ParameterType::Array => "array",
            ParameterType::Object => "object",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SchemaEntry")]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub secure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

// Wire shape of a schema entry; `type` stays a plain string so `secureString`
// can set the secure flag.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaEntry {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    default: Option<Value>,
    #[serde(default = "default_required")]
    required: bool,
    description: Option<String>,
    #[serde(default)]
    secure: bool,
    allowed_values: Option<Vec<Value>>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    min_length: Option<u64>,
    max_length: Option<u64>,
}

fn default_required() -> bool {
    true
}

impl TryFrom<SchemaEntry> for ParameterSchema {
    type Error = String;

    fn try_from(entry: SchemaEntry) -> Result<Self, Self::Error> {
        let (param_type, secure_type) = ParameterType::from_type_name(&entry.type_name)
            .ok_or_else(|| {
                format!(
                    "parameter '{}' has unknown type '{}'",
                    entry.name, entry.type_name
                )
            })?;

        if let Some(default) = &entry.default {
            if !param_type.matches(default) {
                return Err(format!(
                    "default value of parameter '{}' is of type {} but should be of type {}",
                    entry.name,
                    ParameterType::describe_value(default),
                    param_type
                ));
            }
        }

        Ok(ParameterSchema {
            name: entry.name,
            param_type,
            default: entry.default,
            required: entry.required,
            description: entry.description,
            secure: entry.secure || secure_type,
            allowed_values: entry.allowed_values,
            min_value: entry.min_value,
            max_value: entry.max_value,
            min_length: entry.min_length,
            max_length: entry.max_length,
        })
    }
}

impl ParameterSchema {
    pub fn new(name: &str, param_type: ParameterType) -> Self {
        ParameterSchema {
            name: name.to_string(),
            param_type,
            default: None,
            required: true,
            description: None,
            secure: false,
            allowed_values: None,
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_allowed_values(mut self, allowed_values: Vec<Value>) -> Self {
        self.allowed_values = Some(allowed_values);
        self
    }

    pub fn with_value_range(mut self, min_value: Option<f64>, max_value: Option<f64>) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    pub fn with_length_range(mut self, min_length: Option<u64>, max_length: Option<u64>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn env_var_name(&self) -> String {
        get_env_var_name(&self.name)
    }
}

/// The declared parameter set of a project, in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSchemaFile {
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
}

impl ParameterSchemaFile {
    /// Parses YAML, or JSON since it is a subset of YAML.
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for parameter in &self.parameters {
            if !seen.insert(parameter.name.as_str()) {
                duplicates.insert(parameter.name.clone());
            }
        }
        duplicates.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_env_var_name_is_upper_cased_and_prefixed() {
        assert_eq!(get_env_var_name("webAppName"), "AZURE_PARAM_WEBAPPNAME");
        assert_eq!(get_env_var_name("instance_count"), "AZURE_PARAM_INSTANCE_COUNT");
    }

    #[test]
    fn test_type_matches_exact_shape_only() {
        assert!(ParameterType::Number.matches(&json!(3)));
        assert!(ParameterType::Number.matches(&json!(2.5)));
        assert!(!ParameterType::Number.matches(&json!("3")));
        assert!(!ParameterType::Array.matches(&json!({"a": 1})));
        assert!(!ParameterType::Object.matches(&json!([1])));
        assert!(!ParameterType::String.matches(&Value::Null));
    }

    #[test]
    fn test_parse_schema_file_with_arm_type_names() {
        let schema = ParameterSchemaFile::from_yaml(
            r#"
parameters:
  - name: webAppName
    type: string
    description: Name of the web app
  - name: adminPassword
    type: secureString
  - name: instanceCount
    type: int
    default: 3
    minValue: 1
    maxValue: 10
  - name: allowedIps
    type: Array
    required: false
"#,
        )
        .unwrap();

        let names: Vec<&str> = schema.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["webAppName", "adminPassword", "instanceCount", "allowedIps"]);

        assert_eq!(schema.parameters[0].param_type, ParameterType::String);
        assert!(schema.parameters[0].required);
        assert!(!schema.parameters[0].secure);

        assert_eq!(schema.parameters[1].param_type, ParameterType::String);
        assert!(schema.parameters[1].secure);

        assert_eq!(schema.parameters[2].param_type, ParameterType::Number);
        assert_eq!(schema.parameters[2].default, Some(json!(3)));
        assert_eq!(schema.parameters[2].min_value, Some(1.0));

        assert_eq!(schema.parameters[3].param_type, ParameterType::Array);
        assert!(!schema.parameters[3].required);
    }

    #[test]
    fn test_parse_schema_rejects_mistyped_default() {
        let result = ParameterSchemaFile::from_yaml(
            r#"
parameters:
  - name: instanceCount
    type: number
    default: "three"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_schema_rejects_unknown_type() {
        let result = ParameterSchemaFile::from_yaml(
            r#"
parameters:
  - name: thing
    type: tuple
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_names() {
        let schema = ParameterSchemaFile {
            parameters: vec![
                ParameterSchema::new("a", ParameterType::String),
                ParameterSchema::new("b", ParameterType::String),
                ParameterSchema::new("a", ParameterType::Bool),
            ],
        };
        assert_eq!(schema.duplicate_names(), vec!["a".to_string()]);
    }
}
