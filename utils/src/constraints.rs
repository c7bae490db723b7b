use param_defs::ParameterSchema;
use serde_json::Value;

/// Checks a typed value against the allowed values and range limits declared
/// on the schema. Returns a message naming the violated limit.
pub fn check_constraints(schema: &ParameterSchema, value: &Value) -> Result<(), String> {
    if let Some(allowed_values) = &schema.allowed_values {
        if !allowed_values.iter().any(|allowed| same_value(allowed, value)) {
            let allowed = allowed_values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(format!("value must be one of: {}", allowed));
        }
    }

    if let Some(number) = value.as_f64() {
        if let Some(min_value) = schema.min_value {
            if number < min_value {
                return Err(format!("value must be at least {}", min_value));
            }
        }
        if let Some(max_value) = schema.max_value {
            if number > max_value {
                return Err(format!("value must be at most {}", max_value));
            }
        }
    }

    let length = match value {
        Value::String(s) => Some(s.chars().count() as u64),
        Value::Array(items) => Some(items.len() as u64),
        _ => None,
    };
    if let Some(length) = length {
        if let Some(min_length) = schema.min_length {
            if length < min_length {
                return Err(format!("length must be at least {}", min_length));
            }
        }
        if let Some(max_length) = schema.max_length {
            if length > max_length {
                return Err(format!("length must be at most {}", max_length));
            }
        }
    }

    Ok(())
}

// `3` and `3.0` are the same number even though serde_json stores them apart.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => a == b,
    }
}
