//! Command dispatch

use std::io;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::InventoryQuery;
use crate::cli::args::{Cli, Commands, ConfigCommands, InventoryArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;

/// Run the parsed command line and return the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let Some(command) = &cli.command else {
        return Ok(exitcode::OK);
    };
    // completions must work without a loadable config
    if let Commands::Completion { shell } = command {
        clap_complete::generate(*shell, &mut Cli::command(), "rsced", &mut io::stdout());
        return Ok(exitcode::OK);
    }

    let settings = resolve_settings(cli)?;
    let container = ServiceContainer::new(settings);
    run(&container, command)
}

/// Load layered settings and apply command line overrides.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(server) = &cli.server {
        settings.server = server.clone();
    }
    if let Some(catalog) = &cli.catalog {
        settings.catalog = catalog.clone();
    }
    if let Some(workspace) = &cli.workspace {
        settings.workspace = workspace.clone();
    }
    if cli.insecure {
        settings.verify = false;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

/// Run `command` against the services in `container`.
pub fn run(container: &ServiceContainer, command: &Commands) -> CliResult<i32> {
    match command {
        Commands::Lineage { type_name } => cmd_lineage(container, type_name),
        Commands::IsA {
            ancestor,
            descendant,
        } => cmd_is_a(container, ancestor, descendant),
        Commands::Tree { type_name } => cmd_tree(container, type_name.as_deref()),
        Commands::Inventory(args) => cmd_inventory(container, args),
        Commands::Config { command } => cmd_config(container, command),
        Commands::Completion { .. } => Err(CliError::Usage(
            "completion is handled before settings are loaded".into(),
        )),
    }
}

#[instrument(skip(container))]
fn cmd_lineage(container: &ServiceContainer, type_name: &str) -> CliResult<i32> {
    let mut tree = container.type_tree();
    match tree.lineage(type_name)? {
        Some(path) => {
            output::info(&path.join(" > "));
            Ok(exitcode::OK)
        }
        None => Err(CliError::Application(
            crate::domain::DomainError::TypeNotFound(type_name.to_string()).into(),
        )),
    }
}

#[instrument(skip(container))]
fn cmd_is_a(container: &ServiceContainer, ancestor: &str, descendant: &str) -> CliResult<i32> {
    let mut tree = container.type_tree();
    if tree.is_a(ancestor, descendant)? {
        output::yes("true");
        Ok(exitcode::OK)
    } else {
        output::no("false");
        Ok(exitcode::NO)
    }
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, type_name: Option<&str>) -> CliResult<i32> {
    let mut tree = container.type_tree();
    let label = tree.url().to_string();
    let rendered = match type_name {
        Some(name) => tree.subtree(name)?.to_display_tree(name),
        None => tree.populate()?.to_display_tree(label),
    };
    output::info(&rendered);
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_inventory(container: &ServiceContainer, args: &InventoryArgs) -> CliResult<i32> {
    let query = build_query(args)?;
    let elements = container.ced_client().query_inventory(&query)?;
    let json =
        serde_json::to_string_pretty(&elements).map_err(|e| CliError::Output(e.to_string()))?;
    output::info(&json);
    Ok(exitcode::OK)
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(exitcode::OK)
}

/// Translate inventory flags into a query. Empty flag lists are not sent.
pub fn build_query(args: &InventoryArgs) -> CliResult<InventoryQuery> {
    fn non_empty(values: &[String]) -> Option<Vec<String>> {
        (!values.is_empty()).then(|| values.to_vec())
    }

    let mut query = InventoryQuery {
        types: non_empty(&args.types),
        name_nx: non_empty(&args.nx),
        name_ng: non_empty(&args.ng),
        prop_ex: non_empty(&args.ex),
        prop_ea: non_empty(&args.ea),
        date: non_empty(&args.date),
        zone: non_empty(&args.zone),
        properties: non_empty(&args.properties),
        sort: args.sort.clone(),
        repeat_multipass: args.repeat_multipass,
        extra: Vec::new(),
    };
    for param in &args.params {
        let (key, value) = param
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| CliError::InvalidArgs(format!("expected KEY=VALUE, got '{param}'")))?;
        query = query.param(key, value);
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_inventory_flags_when_build_query_then_maps_fields() {
        let args = InventoryArgs {
            types: vec!["IOC".into()],
            zone: vec![],
            repeat_multipass: true,
            params: vec!["l=10".into()],
            ..Default::default()
        };
        let query = build_query(&args).unwrap();
        assert_eq!(query.types, Some(vec!["IOC".to_string()]));
        assert_eq!(query.zone, None);
        assert!(query.repeat_multipass);
        assert_eq!(query.extra, vec![("l".to_string(), "10".to_string())]);
    }

    #[test]
    fn given_param_without_equals_when_build_query_then_invalid_args() {
        let args = InventoryArgs {
            params: vec!["oops".into()],
            ..Default::default()
        };
        assert!(matches!(build_query(&args), Err(CliError::InvalidArgs(_))));
    }
}
