use std::collections::HashSet;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use param_defs::{ParameterSchema, ResolvedParameter, SessionError, REDACTED};
use param_resolver::ResolutionSession;
use param_utils::to_literal;
use prettytable::{row, Table};
use serde_json::{json, Value};

const DEPLOYMENT_PARAMETERS_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2019-04-01/deploymentParameters.json#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary, secure values hidden
    Table,
    /// Resolved parameters as JSON, secure values hidden
    Json,
    /// Deployment parameters document, ready to hand to a deployment
    Arm,
}

fn secure_names(schemas: &[ParameterSchema]) -> HashSet<&str> {
    schemas
        .iter()
        .filter(|s| s.secure)
        .map(|s| s.name.as_str())
        .collect()
}

fn redacted(parameters: &[ResolvedParameter], schemas: &[ParameterSchema]) -> Vec<ResolvedParameter> {
    let secure = secure_names(schemas);
    parameters
        .iter()
        .map(|p| {
            let mut p = p.clone();
            if secure.contains(p.name.as_str()) && p.value.is_some() {
                p.value = Some(Value::String(REDACTED.to_string()));
            }
            p
        })
        .collect()
}

fn resolved_table(parameters: &[ResolvedParameter], schemas: &[ParameterSchema]) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "Name".purple().bold(),
        "Type".blue().bold(),
        "Source".green().bold(),
        "Value".bold(),
    ]);
    for parameter in redacted(parameters, schemas) {
        let value = match &parameter.value {
            Some(value) => to_literal(value),
            None => "(not set)".to_string(),
        };
        table.add_row(row![
            parameter.name,
            parameter.param_type,
            parameter.source,
            value
        ]);
    }
    table
}

pub fn render_resolved(
    session: &ResolutionSession,
    schemas: &[ParameterSchema],
    format: OutputFormat,
) -> Result<String> {
    let rendered = match format {
        OutputFormat::Table => resolved_table(session.resolved(), schemas).to_string(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&redacted(session.resolved(), schemas))?
        }
        OutputFormat::Arm => serde_json::to_string_pretty(&json!({
            "$schema": DEPLOYMENT_PARAMETERS_SCHEMA,
            "contentVersion": "1.0.0.0",
            "parameters": session.to_arm_parameters(),
        }))?,
    };
    Ok(rendered)
}

pub fn print_resolved(
    session: &ResolutionSession,
    schemas: &[ParameterSchema],
    format: OutputFormat,
) -> Result<()> {
    println!("{}", render_resolved(session, schemas, format)?);
    Ok(())
}

pub fn print_session_error(error: &SessionError, schemas: &[ParameterSchema]) {
    eprintln!("{}", error.to_string().red());

    let resolved = error.resolved();
    if !resolved.is_empty() {
        eprintln!("{}", "Resolved before the failure:".bold());
        resolved_table(resolved, schemas).printstd();
    }
    if let SessionError::Aborted { unresolved, .. } = error {
        if !unresolved.is_empty() {
            eprintln!("{} {}", "Unresolved:".bold(), unresolved.join(", "));
        }
    }
}
