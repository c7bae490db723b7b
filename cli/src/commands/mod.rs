pub mod resolve;
pub mod saved;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use param_resolver::ProjectLocator;

/// Project root plus the environment a command works on.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub environment: String,
}

impl ProjectContext {
    pub fn new(root: &Path, environment: &str) -> Self {
        ProjectContext {
            root: root.to_path_buf(),
            environment: environment.to_string(),
        }
    }
}

pub fn open_project(
    locator: &dyn ProjectLocator,
    cwd: &Path,
    environment: Option<&str>,
) -> Result<ProjectContext> {
    let environment = match environment {
        Some(name) if !name.trim().is_empty() => name.trim(),
        _ => {
            return Err(anyhow!(
                "No environment selected. Pass --environment or set AZURE_ENV_NAME"
            ))
        }
    };
    let root = locator.locate(cwd)?;
    Ok(ProjectContext::new(&root, environment))
}
