use std::path::PathBuf;

use thiserror::Error;

use crate::{ParameterType, ResolvedParameter, SourceKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("'{0}' is not a valid boolean, expected one of true/false, 1/0, yes/no, on/off")]
    InvalidBoolean(String),

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("expected a JSON {expected}: {reason}")]
    InvalidJsonShape {
        expected: ParameterType,
        reason: String,
    },
}

impl CoercionError {
    /// Same error with the offending literal masked, for secure parameters.
    pub fn redacted(self) -> Self {
        match self {
            CoercionError::InvalidBoolean(_) => CoercionError::InvalidBoolean(REDACTED.to_string()),
            CoercionError::InvalidNumber(_) => CoercionError::InvalidNumber(REDACTED.to_string()),
            shape @ CoercionError::InvalidJsonShape { .. } => shape,
        }
    }
}

pub const REDACTED: &str = "<redacted>";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Invalid value '{literal}' for parameter '{parameter}' from {source_kind}: {error}")]
    Coercion {
        parameter: String,
        source_kind: SourceKind,
        literal: String,
        error: CoercionError,
    },

    #[error("Value for parameter '{parameter}' from {source_kind} is of type {actual} but should be of type {expected}")]
    TypeConsistency {
        parameter: String,
        source_kind: SourceKind,
        expected: ParameterType,
        actual: String,
    },

    #[error("Value for parameter '{parameter}' from {source_kind} is not allowed: {message}")]
    ConstraintViolation {
        parameter: String,
        source_kind: SourceKind,
        message: String,
    },

    #[error("Prompt for parameter '{parameter}' was cancelled")]
    PromptCancelled { parameter: String },

    #[error("Parameter '{parameter}' is required but no value was found and prompting is disabled. Set {env_var}, add it to the parameters file or provide a default")]
    PromptingDisabled { parameter: String, env_var: String },

    #[error("Prompt for parameter '{parameter}' failed: {message}")]
    PromptFailed { parameter: String, message: String },
}

impl ResolveError {
    pub fn parameter(&self) -> &str {
        match self {
            ResolveError::Coercion { parameter, .. }
            | ResolveError::TypeConsistency { parameter, .. }
            | ResolveError::ConstraintViolation { parameter, .. }
            | ResolveError::PromptCancelled { parameter }
            | ResolveError::PromptingDisabled { parameter, .. }
            | ResolveError::PromptFailed { parameter, .. } => parameter,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, ResolveError::PromptCancelled { .. })
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Parameter resolution stopped: {error}{}", format_prior_failures(.prior_failures))]
    Aborted {
        error: ResolveError,
        /// Failures collected before the session stopped.
        prior_failures: Vec<ResolveError>,
        resolved: Vec<ResolvedParameter>,
        unresolved: Vec<String>,
    },

    #[error("{} parameter(s) could not be resolved:\n{}", .failures.len(), format_failures(.failures))]
    Aggregate {
        failures: Vec<ResolveError>,
        resolved: Vec<ResolvedParameter>,
    },
}

impl SessionError {
    pub fn failures(&self) -> Vec<&ResolveError> {
        match self {
            SessionError::Aborted {
                error,
                prior_failures,
                ..
            } => prior_failures.iter().chain(std::iter::once(error)).collect(),
            SessionError::Aggregate { failures, .. } => failures.iter().collect(),
        }
    }

    pub fn resolved(&self) -> &[ResolvedParameter] {
        match self {
            SessionError::Aborted { resolved, .. } | SessionError::Aggregate { resolved, .. } => {
                resolved
            }
        }
    }
}

fn format_prior_failures(failures: &[ResolveError]) -> String {
    if failures.is_empty() {
        String::new()
    } else {
        format!("\nEarlier failures:\n{}", format_failures(failures))
    }
}

fn format_failures(failures: &[ResolveError]) -> String {
    failures
        .iter()
        .map(|failure| format!("  - {}", failure))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("No project found in {} or any parent directory. A project is identified by an azure.yaml file", .start.display())]
    NoProject { start: PathBuf },
}
