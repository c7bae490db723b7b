mod config_store;
mod output;
mod parameters_file;
mod project;
mod prompter;
mod schema;

pub mod commands;

pub use config_store::FileConfigStore;
pub use output::{print_resolved, print_session_error, render_resolved, OutputFormat};
pub use parameters_file::ArmParameterFileLoader;
pub use project::WorkingDirLocator;
pub use prompter::ConsolePrompter;
pub use schema::load_schema_file;
