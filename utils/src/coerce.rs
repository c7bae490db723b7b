use param_defs::{CoercionError, ParameterType};
use serde_json::{Number, Value};

/// Converts a textual literal into a value of `target`.
///
/// Strings are taken verbatim. Booleans and numbers ignore surrounding
/// whitespace. Arrays and objects must be JSON whose top-level shape matches
/// the declared type.
pub fn coerce(raw: &str, target: ParameterType) -> Result<Value, CoercionError> {
    match target {
        ParameterType::String => Ok(Value::String(raw.to_string())),
        ParameterType::Bool => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| CoercionError::InvalidBoolean(raw.to_string())),
        ParameterType::Number => parse_number(raw)
            .map(Value::Number)
            .ok_or_else(|| CoercionError::InvalidNumber(raw.to_string())),
        ParameterType::Array | ParameterType::Object => parse_json_shape(raw, target),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    if let Ok(uint) = trimmed.parse::<u64>() {
        return Some(Number::from(uint));
    }
    // f64 parsing accepts "inf" and "NaN"; from_f64 rejects them.
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

fn parse_json_shape(raw: &str, target: ParameterType) -> Result<Value, CoercionError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| CoercionError::InvalidJsonShape {
            expected: target,
            reason: err.to_string(),
        })?;

    if target.matches(&value) {
        Ok(value)
    } else {
        Err(CoercionError::InvalidJsonShape {
            expected: target,
            reason: format!("got a JSON {}", ParameterType::describe_value(&value)),
        })
    }
}

/// Textual form of a typed value that `coerce` maps back to the same value.
pub fn to_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
