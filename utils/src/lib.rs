mod coerce;
mod config_path;
mod constraints;
mod dotenv;
mod envsubst;
mod logging;

pub use coerce::{coerce, to_literal};
pub use config_path::{
    find_project_root, get_default_parameters_file, get_default_schema_file, get_dotenv_path,
    get_environment_dir, get_saved_config_path, PROJECT_FILE,
};
pub use constraints::check_constraints;
pub use dotenv::parse_dotenv;
pub use envsubst::substitute_env_vars;
pub use logging::setup_logging;
