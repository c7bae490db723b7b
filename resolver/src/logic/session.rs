use log::{info, warn};
use param_defs::{ParameterSchema, ResolveError, ResolvedParameter, SessionError, SourceKind};
use serde_json::{json, Map, Value};

use super::resolver::ParameterResolver;

/// What a session does when a parameter fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure.
    FailFast,
    /// Keep going and report every failure at the end.
    Aggregate,
}

impl FailurePolicy {
    pub fn default_for(interactive: bool) -> Self {
        if interactive {
            FailurePolicy::Aggregate
        } else {
            FailurePolicy::FailFast
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// `None` picks `FailurePolicy::default_for` the resolver's mode.
    pub policy: Option<FailurePolicy>,
    /// Treat a cancelled prompt like any other failure instead of stopping.
    pub continue_after_cancel: bool,
}

/// Outcome of resolving a project's full parameter set, in declaration order.
#[derive(Debug, Clone)]
pub struct ResolutionSession {
    resolved: Vec<ResolvedParameter>,
    prompted_count: usize,
}

impl ResolutionSession {
    /// Resolves `schemas` one at a time, in order. Prompts are therefore
    /// presented in declaration order and never interleave.
    pub fn resolve_all(
        resolver: &ParameterResolver,
        schemas: &[ParameterSchema],
        options: &SessionOptions,
    ) -> Result<ResolutionSession, SessionError> {
        let policy = options
            .policy
            .unwrap_or_else(|| FailurePolicy::default_for(resolver.is_interactive()));

        let mut resolved = Vec::with_capacity(schemas.len());
        let mut failures: Vec<ResolveError> = Vec::new();

        for (index, schema) in schemas.iter().enumerate() {
            let error = match resolver.resolve(schema) {
                Ok(parameter) => {
                    resolved.push(parameter);
                    continue;
                }
                Err(error) => error,
            };

            let stop = policy == FailurePolicy::FailFast
                || (error.is_cancellation() && !options.continue_after_cancel);
            if stop {
                let unresolved = failures
                    .iter()
                    .map(|failure| failure.parameter().to_string())
                    .chain(schemas[index..].iter().map(|s| s.name.clone()))
                    .collect::<Vec<_>>();
                warn!(
                    "Stopping parameter resolution at '{}', {} parameter(s) left unresolved",
                    schema.name,
                    unresolved.len()
                );
                return Err(SessionError::Aborted {
                    error,
                    prior_failures: failures,
                    resolved,
                    unresolved,
                });
            }

            warn!("{}", error);
            failures.push(error);
        }

        if !failures.is_empty() {
            return Err(SessionError::Aggregate { failures, resolved });
        }

        let prompted_count = resolved
            .iter()
            .filter(|p| p.source == SourceKind::Prompted)
            .count();
        info!(
            "Resolved {} parameter(s), {} prompted",
            resolved.len(),
            prompted_count
        );

        Ok(ResolutionSession {
            resolved,
            prompted_count,
        })
    }

    pub fn resolved(&self) -> &[ResolvedParameter] {
        &self.resolved
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedParameter> {
        self.resolved.iter().find(|p| p.name == name)
    }

    /// Number of parameters whose value came from an interactive prompt.
    pub fn prompted_count(&self) -> usize {
        self.prompted_count
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.names_from(SourceKind::Skipped)
    }

    pub fn defaulted(&self) -> Vec<&str> {
        self.names_from(SourceKind::SchemaDefault)
    }

    pub fn prompted(&self) -> Vec<&str> {
        self.names_from(SourceKind::Prompted)
    }

    fn names_from(&self, source: SourceKind) -> Vec<&str> {
        self.resolved
            .iter()
            .filter(|p| p.source == source)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// `{"<name>": {"value": <value>}}` for every parameter that has a value.
    pub fn to_arm_parameters(&self) -> Value {
        let mut parameters = Map::new();
        for parameter in &self.resolved {
            if let Some(value) = &parameter.value {
                parameters.insert(parameter.name.clone(), json!({ "value": value }));
            }
        }
        Value::Object(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{MemoryConfigStore, MockInteractivePrompter, PromptOutcome};
    use crate::logic::{EnvironmentSource, ParameterFileSource, SavedConfigSource};
    use param_defs::ParameterType;
    use pretty_assertions::assert_eq;

    fn schemas() -> Vec<ParameterSchema> {
        vec![
            ParameterSchema::new("webAppName", ParameterType::String),
            ParameterSchema::new("instanceCount", ParameterType::Number).with_default(json!(3)),
            ParameterSchema::new("location", ParameterType::String),
            ParameterSchema::new("tags", ParameterType::Object).optional(),
        ]
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let store = MemoryConfigStore::new();
        let resolver = ParameterResolver::new(
            [("AZURE_PARAM_WEBAPPNAME", "todo-web")].into_iter().collect(),
            SavedConfigSource::new("dev", &store),
            ParameterFileSource::default(),
        );

        let error =
            ResolutionSession::resolve_all(&resolver, &schemas(), &SessionOptions::default())
                .unwrap_err();

        match error {
            SessionError::Aborted {
                error,
                resolved,
                unresolved,
                ..
            } => {
                assert_eq!(error.parameter(), "location");
                assert!(matches!(error, ResolveError::PromptingDisabled { .. }));
                let names: Vec<&str> = resolved.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["webAppName", "instanceCount"]);
                assert_eq!(unresolved, vec!["location".to_string(), "tags".to_string()]);
            }
            other => panic!("expected an aborted session, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_reports_every_failure() {
        let store = MemoryConfigStore::new();
        let resolver = ParameterResolver::new(
            [("AZURE_PARAM_INSTANCECOUNT", "many")].into_iter().collect(),
            SavedConfigSource::new("dev", &store),
            ParameterFileSource::default(),
        );
        let options = SessionOptions {
            policy: Some(FailurePolicy::Aggregate),
            ..Default::default()
        };

        let error = ResolutionSession::resolve_all(&resolver, &schemas(), &options).unwrap_err();

        let failed: Vec<&str> = error.failures().iter().map(|f| f.parameter()).collect();
        assert_eq!(failed, vec!["webAppName", "instanceCount", "location"]);
        let resolved: Vec<&str> = error.resolved().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(resolved, vec!["tags"]);
    }

    #[test]
    fn test_cancellation_stops_interactive_session() {
        let mut prompter = MockInteractivePrompter::new();
        prompter
            .expect_ask()
            .times(1)
            .returning(|_| Ok(PromptOutcome::Cancelled));

        let store = MemoryConfigStore::new();
        let resolver = ParameterResolver::new(
            EnvironmentSource::default(),
            SavedConfigSource::new("dev", &store),
            ParameterFileSource::default(),
        )
        .with_prompter(&prompter);

        let error =
            ResolutionSession::resolve_all(&resolver, &schemas(), &SessionOptions::default())
                .unwrap_err();

        match error {
            SessionError::Aborted {
                error,
                resolved,
                unresolved,
                ..
            } => {
                assert!(error.is_cancellation());
                assert!(resolved.is_empty());
                assert_eq!(unresolved.len(), 4);
            }
            other => panic!("expected an aborted session, got {:?}", other),
        }
    }

    #[test]
    fn test_cancellation_keeps_failures_collected_before_it() {
        let mut prompter = MockInteractivePrompter::new();
        prompter
            .expect_ask()
            .withf(|schema| schema.name == "location")
            .times(1)
            .returning(|_| Ok(PromptOutcome::Cancelled));

        let store = MemoryConfigStore::new();
        let resolver = ParameterResolver::new(
            [("AZURE_PARAM_COUNT", "abc")].into_iter().collect(),
            SavedConfigSource::new("dev", &store),
            ParameterFileSource::default(),
        )
        .with_prompter(&prompter);
        let schemas = vec![
            ParameterSchema::new("count", ParameterType::Number),
            ParameterSchema::new("location", ParameterType::String),
        ];
        let options = SessionOptions {
            policy: Some(FailurePolicy::Aggregate),
            ..Default::default()
        };

        let error = ResolutionSession::resolve_all(&resolver, &schemas, &options).unwrap_err();

        let failures = error.failures();
        assert_eq!(failures.len(), 2);
        assert!(matches!(failures[0], ResolveError::Coercion { .. }));
        assert_eq!(failures[0].parameter(), "count");
        assert!(failures[1].is_cancellation());
        assert!(error.to_string().contains("Earlier failures:"));
        match error {
            SessionError::Aborted { unresolved, .. } => {
                assert_eq!(unresolved, vec!["count".to_string(), "location".to_string()]);
            }
            other => panic!("expected an aborted session, got {:?}", other),
        }
    }

    #[test]
    fn test_continue_after_cancel_collects_cancellations() {
        let mut prompter = MockInteractivePrompter::new();
        prompter
            .expect_ask()
            .times(2)
            .returning(|_| Ok(PromptOutcome::Cancelled));

        let store = MemoryConfigStore::new();
        let resolver = ParameterResolver::new(
            EnvironmentSource::default(),
            SavedConfigSource::new("dev", &store),
            ParameterFileSource::default(),
        )
        .with_prompter(&prompter);
        let options = SessionOptions {
            policy: None,
            continue_after_cancel: true,
        };

        let error = ResolutionSession::resolve_all(&resolver, &schemas(), &options).unwrap_err();
        assert!(matches!(error, SessionError::Aggregate { .. }));
        assert_eq!(error.failures().len(), 2);
        assert_eq!(error.resolved().len(), 2);
    }

    #[test]
    fn test_session_summary_and_arm_parameters() {
        let mut prompter = MockInteractivePrompter::new();
        prompter
            .expect_ask()
            .withf(|schema| schema.name == "location")
            .times(1)
            .returning(|_| Ok(PromptOutcome::Value(json!("westeurope"))));

        let store = MemoryConfigStore::new();
        let resolver = ParameterResolver::new(
            [("AZURE_PARAM_WEBAPPNAME", "todo-web")].into_iter().collect(),
            SavedConfigSource::new("dev", &store),
            ParameterFileSource::default(),
        )
        .with_prompter(&prompter);

        let session =
            ResolutionSession::resolve_all(&resolver, &schemas(), &SessionOptions::default())
                .unwrap();

        assert_eq!(session.prompted_count(), 1);
        assert_eq!(session.prompted(), vec!["location"]);
        assert_eq!(session.defaulted(), vec!["instanceCount"]);
        assert_eq!(session.skipped(), vec!["tags"]);
        assert_eq!(
            session.get("webAppName").map(|p| p.source),
            Some(SourceKind::Environment)
        );
        assert_eq!(
            session.to_arm_parameters(),
            json!({
                "webAppName": {"value": "todo-web"},
                "instanceCount": {"value": 3},
                "location": {"value": "westeurope"},
            })
        );
    }
}
