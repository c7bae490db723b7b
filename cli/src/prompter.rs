use anyhow::Result;
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, InquireError, Password, Select, Text};
use param_defs::{ParameterSchema, ParameterType};
use param_resolver::{InteractivePrompter, PromptOutcome, SavedConfigStore};
use param_utils::{check_constraints, coerce, to_literal};
use serde_json::Value;

/// Terminal prompter. Input is checked with the resolver's coercion and
/// constraint rules while typing, so a returned value is always well typed.
pub struct ConsolePrompter<'a> {
    store: &'a dyn SavedConfigStore,
    environment: String,
}

impl<'a> ConsolePrompter<'a> {
    pub fn new(store: &'a dyn SavedConfigStore, environment: &str) -> Self {
        ConsolePrompter {
            store,
            environment: environment.to_string(),
        }
    }

    fn message(schema: &ParameterSchema) -> String {
        let kind = if schema.secure {
            "secured parameter"
        } else {
            "infrastructure parameter"
        };
        format!("Enter a value for the '{}' {}:", schema.name, kind)
    }

    fn ask_value(&self, schema: &ParameterSchema) -> Result<Value, InquireError> {
        let message = Self::message(schema);
        let help = schema.description.as_deref();

        if let Some(choices) = choices(schema) {
            let labels: Vec<String> = choices.iter().map(|(label, _)| label.clone()).collect();
            let mut select = Select::new(&message, labels);
            select.help_message = help;
            let choice = select.raw_prompt()?;
            return Ok(choices[choice.index].1.clone());
        }

        let validating = schema.clone();
        let validator = move |input: &str| -> Result<Validation, CustomUserError> {
            match parse_input(&validating, input) {
                Ok(_) => Ok(Validation::Valid),
                Err(e) => Ok(Validation::Invalid(e.to_string().into())),
            }
        };

        let input = if schema.secure {
            let mut password = Password::new(&message)
                .without_confirmation()
                .with_validator(validator);
            password.help_message = help;
            password.prompt()?
        } else {
            let mut text = Text::new(&message).with_validator(validator);
            text.help_message = help;
            text.prompt()?
        };

        // The validator has already accepted this input.
        parse_input(schema, &input).map_err(InquireError::Custom)
    }

    fn offer_to_save(&self, schema: &ParameterSchema, value: &Value) {
        if schema.secure {
            return;
        }
        let save = Confirm::new("Save the value in the environment for future use")
            .with_default(true)
            .prompt();
        match save {
            Ok(true) => {
                if let Err(e) = self.store.set(&self.environment, &schema.name, value) {
                    log::warn!("Failed to save value of '{}': {:#}", schema.name, e);
                }
            }
            Ok(false) => {}
            Err(e) => log::warn!("Not saving value of '{}': {}", schema.name, e),
        }
    }
}

/// Labels and values offered as a fixed list instead of free input: the
/// declared allowed values, or False/True for booleans.
fn choices(schema: &ParameterSchema) -> Option<Vec<(String, Value)>> {
    if let Some(allowed_values) = schema.allowed_values.as_ref().filter(|v| !v.is_empty()) {
        return Some(
            allowed_values
                .iter()
                .map(|value| (to_literal(value), value.clone()))
                .collect(),
        );
    }
    if schema.param_type == ParameterType::Bool {
        return Some(vec![
            ("False".to_string(), Value::Bool(false)),
            ("True".to_string(), Value::Bool(true)),
        ]);
    }
    None
}

fn parse_input(
    schema: &ParameterSchema,
    input: &str,
) -> Result<Value, CustomUserError> {
    let value = coerce(input, schema.param_type)?;
    check_constraints(schema, &value)?;
    Ok(value)
}

impl InteractivePrompter for ConsolePrompter<'_> {
    fn ask(&self, schema: &ParameterSchema) -> Result<PromptOutcome> {
        match self.ask_value(schema) {
            Ok(value) => {
                self.offer_to_save(schema, &value);
                Ok(PromptOutcome::Value(value))
            }
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                Ok(PromptOutcome::Cancelled)
            }
            Err(e) => Err(e.into()),
        }
    }
}
