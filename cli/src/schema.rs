use std::path::Path;

use anyhow::{anyhow, Context, Result};
use param_defs::{ParameterSchema, ParameterSchemaFile};

/// Reads the declared parameters of a project, in declaration order.
pub fn load_schema_file(path: &Path) -> Result<Vec<ParameterSchema>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter schema {}", path.display()))?;
    let schema = ParameterSchemaFile::from_yaml(&contents)
        .with_context(|| format!("Failed to parse parameter schema {}", path.display()))?;

    let duplicates = schema.duplicate_names();
    if !duplicates.is_empty() {
        return Err(anyhow!(
            "Parameter schema {} declares these parameters more than once: \"{}\"",
            path.display(),
            duplicates.join("\", \"")
        ));
    }

    log::debug!(
        "Loaded {} parameter declaration(s) from {}",
        schema.parameters.len(),
        path.display()
    );
    Ok(schema.parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_schema_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("parameters.schema.yaml");
        std::fs::write(
            &path,
            "parameters:\n  - name: location\n    type: string\n  - name: count\n    type: int\n    default: 1\n",
        )
        .unwrap();

        let parameters = load_schema_file(&path).unwrap();
        let names: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["location", "count"]);
    }

    #[test]
    fn test_load_schema_file_rejects_duplicates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("parameters.schema.yaml");
        std::fs::write(
            &path,
            "parameters:\n  - name: location\n    type: string\n  - name: location\n    type: string\n",
        )
        .unwrap();

        let error = load_schema_file(&path).unwrap_err();
        assert!(error.to_string().contains("\"location\""));
    }
}
