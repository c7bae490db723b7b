use std::path::PathBuf;

use anyhow::Result;
use azparams::commands::resolve::{handle_resolve, ResolveOptions};
use azparams::commands::saved::{handle_list, handle_unset};
use azparams::commands::{open_project, ProjectContext};
use azparams::{OutputFormat, WorkingDirLocator};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use param_resolver::FailurePolicy;
use param_utils::setup_logging;

#[derive(Parser, Debug)]
#[command(
    name = "azparams",
    version,
    about = "Resolves infrastructure parameters for a provisioning run",
    subcommand_required = true,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve every declared parameter and print the result
    Resolve(ResolveArgs),
    /// Manage parameter values saved for an environment
    Saved(SavedArgs),
}

#[derive(Args, Debug)]
struct EnvironmentArg {
    /// Environment name, e.g. dev, prod
    #[arg(long, short = 'e', env = "AZURE_ENV_NAME")]
    environment: Option<String>,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    #[command(flatten)]
    environment: EnvironmentArg,

    /// Parameter schema, defaults to infra/parameters.schema.yaml
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Parameters file, defaults to infra/main.parameters.json when present
    #[arg(long, value_name = "FILE")]
    parameters: Option<PathBuf>,

    /// Fail instead of prompting for missing values
    #[arg(
        long,
        env = "AZD_NO_PROMPT",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    no_prompt: bool,

    /// What to do when a parameter fails to resolve
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Args, Debug)]
struct SavedArgs {
    #[command(flatten)]
    environment: EnvironmentArg,

    #[command(subcommand)]
    command: SavedCommand,
}

#[derive(Subcommand, Debug)]
enum SavedCommand {
    /// List saved parameter values
    List,
    /// Forget a saved parameter value
    Unset {
        /// Parameter name
        name: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Stop at the first failure
    FailFast,
    /// Report every failure at the end
    Aggregate,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::FailFast => FailurePolicy::FailFast,
            PolicyArg::Aggregate => FailurePolicy::Aggregate,
        }
    }
}

fn project(environment: &EnvironmentArg) -> Result<ProjectContext> {
    let cwd = std::env::current_dir()?;
    open_project(&WorkingDirLocator, &cwd, environment.environment.as_deref())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve(args) => {
            let project = project(&args.environment)?;
            let options = ResolveOptions {
                schema: args.schema,
                parameters: args.parameters,
                no_prompt: args.no_prompt,
                policy: args.policy.map(FailurePolicy::from),
                output: args.output,
            };
            handle_resolve(&project, &options)
        }
        Command::Saved(args) => {
            let project = project(&args.environment)?;
            match args.command {
                SavedCommand::List => handle_list(&project),
                SavedCommand::Unset { name } => handle_unset(&project, &name),
            }
        }
    }
}

fn main() {
    if let Err(e) = setup_logging() {
        eprintln!("Failed to set up logging: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "azparams",
            "resolve",
            "-e",
            "dev",
            "--no-prompt",
            "--policy",
            "aggregate",
            "--output",
            "arm",
        ])
        .unwrap();
        match cli.command {
            Command::Resolve(args) => {
                assert_eq!(args.environment.environment.as_deref(), Some("dev"));
                assert!(args.no_prompt);
                assert!(matches!(args.policy, Some(PolicyArg::Aggregate)));
                assert_eq!(args.output, OutputFormat::Arm);
            }
            other => panic!("expected resolve, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_saved_unset() {
        let cli = Cli::try_parse_from(["azparams", "saved", "-e", "dev", "unset", "location"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Saved(SavedArgs {
                command: SavedCommand::Unset { .. },
                ..
            })
        ));
    }
}
