use regex::{Captures, Regex};

/// Replaces every `${NAME}` placeholder using `lookup`. Unknown names become
/// the empty string.
pub fn substitute_env_vars<F>(contents: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    re.replace_all(contents, |caps: &Captures| {
        let name = &caps[1];
        match lookup(name) {
            Some(value) => value,
            None => {
                log::debug!("No value found for ${{{}}}, substituting empty string", name);
                String::new()
            }
        }
    })
    .into_owned()
}
