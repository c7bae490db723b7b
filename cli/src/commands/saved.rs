use anyhow::Result;
use colored::Colorize;
use param_resolver::SavedConfigStore;
use param_utils::to_literal;
use prettytable::{row, Table};

use super::ProjectContext;
use crate::FileConfigStore;

pub fn handle_list(project: &ProjectContext) -> Result<()> {
    let store = FileConfigStore::open(&project.root, &project.environment)?;
    let values = store.list(&project.environment);
    if values.is_empty() {
        println!(
            "No saved parameter values for environment '{}'",
            project.environment
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row!["Name".purple().bold(), "Value".bold()]);
    for (name, value) in &values {
        table.add_row(row![name, to_literal(value)]);
    }
    table.printstd();
    Ok(())
}

pub fn handle_unset(project: &ProjectContext, name: &str) -> Result<()> {
    let store = FileConfigStore::open(&project.root, &project.environment)?;
    store.unset(&project.environment, name)?;
    println!(
        "Removed saved value of '{}' from environment '{}'",
        name, project.environment
    );
    Ok(())
}
