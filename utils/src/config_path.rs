use std::path::{Path, PathBuf};

use param_defs::LocatorError;

/// File that marks the root of a project.
pub const PROJECT_FILE: &str = "azure.yaml";

const ENVIRONMENTS_DIR: &str = ".azure";

/// Walks up from `start` until a directory containing `azure.yaml` is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, LocatorError> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_FILE).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| LocatorError::NoProject {
            start: start.to_path_buf(),
        })
}

/// `<project>/.azure/<environment>`
pub fn get_environment_dir(project_root: &Path, environment: &str) -> PathBuf {
    project_root.join(ENVIRONMENTS_DIR).join(environment)
}

/// Saved parameter values live in `<project>/.azure/<environment>/config.json`
pub fn get_saved_config_path(project_root: &Path, environment: &str) -> PathBuf {
    get_environment_dir(project_root, environment).join("config.json")
}

/// Environment values used for `${VAR}` substitution in the parameters file
pub fn get_dotenv_path(project_root: &Path, environment: &str) -> PathBuf {
    get_environment_dir(project_root, environment).join(".env")
}

pub fn get_default_parameters_file(project_root: &Path) -> PathBuf {
    project_root.join("infra").join("main.parameters.json")
}

pub fn get_default_schema_file(project_root: &Path) -> PathBuf {
    project_root.join("infra").join("parameters.schema.yaml")
}
