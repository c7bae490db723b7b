use std::path::{Path, PathBuf};

use param_defs::LocatorError;
use param_resolver::ProjectLocator;
use param_utils::find_project_root;

/// Finds the project by walking up from the working directory to `azure.yaml`.
pub struct WorkingDirLocator;

impl ProjectLocator for WorkingDirLocator {
    fn locate(&self, cwd: &Path) -> Result<PathBuf, LocatorError> {
        let root = find_project_root(cwd)?;
        log::debug!("Using project root {}", root.display());
        Ok(root)
    }
}
