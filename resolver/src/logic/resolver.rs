use log::{debug, info};
use param_defs::{
    ParameterSchema, ParameterType, RawValue, ResolveError, ResolvedParameter, SourceKind,
    REDACTED,
};
use param_utils::{check_constraints, coerce};
use serde_json::Value;

use super::sources::{EnvironmentSource, ParameterFileSource, SavedConfigSource, ValueSource};
use crate::interface::{InteractivePrompter, PromptOutcome};

/// Resolves single parameters against the fixed precedence chain:
/// environment, saved config, parameters file, schema default, prompt.
pub struct ParameterResolver<'a> {
    environment: EnvironmentSource,
    saved_config: SavedConfigSource<'a>,
    parameter_file: ParameterFileSource,
    prompter: Option<&'a dyn InteractivePrompter>,
}

impl<'a> ParameterResolver<'a> {
    /// A resolver without a prompter never prompts; required parameters that
    /// nothing answers for fail instead.
    pub fn new(
        environment: EnvironmentSource,
        saved_config: SavedConfigSource<'a>,
        parameter_file: ParameterFileSource,
    ) -> Self {
        ParameterResolver {
            environment,
            saved_config,
            parameter_file,
            prompter: None,
        }
    }

    pub fn with_prompter(mut self, prompter: &'a dyn InteractivePrompter) -> Self {
        self.prompter = Some(prompter);
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.prompter.is_some()
    }

    fn chain(&self) -> [ValueSource<'_>; 4] {
        [
            ValueSource::Environment(&self.environment),
            ValueSource::SavedConfig(&self.saved_config),
            ValueSource::ParameterFile(&self.parameter_file),
            ValueSource::SchemaDefault,
        ]
    }

    pub fn resolve(&self, schema: &ParameterSchema) -> Result<ResolvedParameter, ResolveError> {
        for source in self.chain() {
            let source_kind = source.kind();
            match source.lookup(schema) {
                RawValue::Absent => {
                    debug!("Parameter '{}': no value from {}", schema.name, source_kind);
                }
                RawValue::ExplicitSkip => {
                    info!(
                        "Parameter '{}' skipped: {} is set to an empty string",
                        schema.name,
                        schema.env_var_name()
                    );
                    return Ok(ResolvedParameter::skipped(&schema.name, schema.param_type));
                }
                RawValue::Text(literal) => {
                    let value = coerce(&literal, schema.param_type).map_err(|error| {
                        let (literal, error) = if schema.secure {
                            (REDACTED.to_string(), error.redacted())
                        } else {
                            (literal.clone(), error)
                        };
                        ResolveError::Coercion {
                            parameter: schema.name.clone(),
                            source_kind,
                            literal,
                            error,
                        }
                    })?;
                    return self.accept(schema, value, source_kind);
                }
                RawValue::Typed(value) => {
                    check_type(schema, &value, source_kind)?;
                    return self.accept(schema, value, source_kind);
                }
            }
        }

        self.prompt(schema)
    }

    fn prompt(&self, schema: &ParameterSchema) -> Result<ResolvedParameter, ResolveError> {
        if !schema.required {
            info!(
                "Parameter '{}' is optional and has no value, leaving it unset",
                schema.name
            );
            return Ok(ResolvedParameter::skipped(&schema.name, schema.param_type));
        }

        let prompter = match self.prompter {
            Some(prompter) => prompter,
            None => {
                return Err(ResolveError::PromptingDisabled {
                    parameter: schema.name.clone(),
                    env_var: schema.env_var_name(),
                })
            }
        };

        debug!("Prompting for parameter '{}'", schema.name);
        match prompter.ask(schema) {
            Ok(PromptOutcome::Value(value)) => {
                check_type(schema, &value, SourceKind::Prompted)?;
                self.accept(schema, value, SourceKind::Prompted)
            }
            Ok(PromptOutcome::Cancelled) => Err(ResolveError::PromptCancelled {
                parameter: schema.name.clone(),
            }),
            Err(e) => Err(ResolveError::PromptFailed {
                parameter: schema.name.clone(),
                message: format!("{:#}", e),
            }),
        }
    }

    fn accept(
        &self,
        schema: &ParameterSchema,
        value: Value,
        source_kind: SourceKind,
    ) -> Result<ResolvedParameter, ResolveError> {
        check_constraints(schema, &value).map_err(|message| ResolveError::ConstraintViolation {
            parameter: schema.name.clone(),
            source_kind,
            message,
        })?;

        if schema.secure {
            info!("Parameter '{}' resolved from {}", schema.name, source_kind);
        } else {
            info!(
                "Parameter '{}' resolved from {}: {}",
                schema.name, source_kind, value
            );
        }
        Ok(ResolvedParameter::new(
            &schema.name,
            schema.param_type,
            value,
            source_kind,
        ))
    }
}

// Typed sources are trusted to store the declared type; a mismatch means the
// store is out of sync with the schema.
fn check_type(
    schema: &ParameterSchema,
    value: &Value,
    source_kind: SourceKind,
) -> Result<(), ResolveError> {
    if schema.param_type.matches(value) {
        Ok(())
    } else {
        Err(ResolveError::TypeConsistency {
            parameter: schema.name.clone(),
            source_kind,
            expected: schema.param_type,
            actual: ParameterType::describe_value(value).to_string(),
        })
    }
}
