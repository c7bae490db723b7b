use std::collections::BTreeMap;

/// Parses `KEY=VALUE` lines of an environment `.env` file. Blank lines and
/// `#` comments are ignored, surrounding quotes are stripped.
pub fn parse_dotenv(contents: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            values.insert(key.trim().to_string(), value.to_string());
        } else {
            log::warn!("Ignoring malformed line in .env file: {}", line);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_dotenv() {
        let values = parse_dotenv(
            r#"
# written by provisioning
AZURE_ENV_NAME="dev"
AZURE_LOCATION='westeurope'
export AZURE_SUBSCRIPTION_ID=0000-1111
EMPTY=
"#,
        );
        let expected: BTreeMap<String, String> = [
            ("AZURE_ENV_NAME", "dev"),
            ("AZURE_LOCATION", "westeurope"),
            ("AZURE_SUBSCRIPTION_ID", "0000-1111"),
            ("EMPTY", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(values, expected);
    }
}
