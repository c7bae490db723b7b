use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use param_defs::{ParameterSchema, SessionError};
use param_resolver::{
    EnvironmentSource, FailurePolicy, InteractivePrompter, ParameterFileLoader,
    ParameterFileSource, ParameterResolver, ResolutionSession, SavedConfigSource, SessionOptions,
};
use param_utils::{
    get_default_parameters_file, get_default_schema_file, get_dotenv_path, parse_dotenv,
};

use super::ProjectContext;
use crate::{
    load_schema_file, print_resolved, print_session_error, ArmParameterFileLoader,
    ConsolePrompter, FileConfigStore, OutputFormat,
};

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub schema: Option<PathBuf>,
    pub parameters: Option<PathBuf>,
    pub no_prompt: bool,
    pub policy: Option<FailurePolicy>,
    pub output: OutputFormat,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            schema: None,
            parameters: None,
            no_prompt: false,
            policy: None,
            output: OutputFormat::Table,
        }
    }
}

fn load_env_values(project: &ProjectContext) -> Result<BTreeMap<String, String>> {
    let path = get_dotenv_path(&project.root, &project.environment);
    if !path.is_file() {
        debug!("No environment values at {}", path.display());
        return Ok(BTreeMap::new());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_dotenv(&contents))
}

fn load_parameter_file(
    project: &ProjectContext,
    options: &ResolveOptions,
) -> Result<ParameterFileSource> {
    let loader = ArmParameterFileLoader::new(load_env_values(project)?);
    let path = match &options.parameters {
        Some(path) => path.clone(),
        None => {
            let path = get_default_parameters_file(&project.root);
            if !path.is_file() {
                debug!("No parameters file at {}", path.display());
                return Ok(ParameterFileSource::default());
            }
            path
        }
    };
    Ok(ParameterFileSource::new(loader.load(&path)?))
}

/// Resolves every declared parameter of the project. The outer `Result`
/// covers loading the project's files, the inner one the resolution itself.
pub fn resolve_project(
    project: &ProjectContext,
    options: &ResolveOptions,
    environment: EnvironmentSource,
) -> Result<(Vec<ParameterSchema>, Result<ResolutionSession, SessionError>)> {
    let schema_path = options
        .schema
        .clone()
        .unwrap_or_else(|| get_default_schema_file(&project.root));
    let schemas = load_schema_file(&schema_path)?;
    let parameter_file = load_parameter_file(project, options)?;
    let store = FileConfigStore::open(&project.root, &project.environment)?;

    let prompter = ConsolePrompter::new(&store, &project.environment);
    let mut resolver = ParameterResolver::new(
        environment,
        SavedConfigSource::new(&project.environment, &store),
        parameter_file,
    );
    if options.no_prompt {
        info!("Prompting is disabled");
    } else {
        resolver = resolver.with_prompter(&prompter as &dyn InteractivePrompter);
    }

    let session_options = SessionOptions {
        policy: options.policy,
        ..Default::default()
    };
    let session = ResolutionSession::resolve_all(&resolver, &schemas, &session_options);
    Ok((schemas, session))
}

pub fn handle_resolve(project: &ProjectContext, options: &ResolveOptions) -> Result<()> {
    let (schemas, session) = resolve_project(project, options, EnvironmentSource::from_process())?;
    match session {
        Ok(session) => print_resolved(&session, &schemas, options.output),
        Err(error) => {
            print_session_error(&error, &schemas);
            let cancelled = error.failures().iter().any(|f| f.is_cancellation());
            if cancelled {
                Err(anyhow!("Parameter resolution was cancelled"))
            } else {
                Err(anyhow!(
                    "Parameter resolution failed for environment '{}'",
                    project.environment
                ))
            }
        }
    }
}
