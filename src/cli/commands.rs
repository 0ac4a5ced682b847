//! Command dispatch: one handler per subcommand

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::RuleDiagnostic;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{parse, to_text, CompiledRule, DomainError, ToTermTree};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Check { file } => cmd_check(cli, file),
        Commands::Ebnf { file, rule, prefix } => {
            cmd_ebnf(cli, file, rule.as_deref(), prefix.as_deref())
        }
        Commands::Diagram {
            file,
            rule,
            compact,
        } => cmd_diagram(cli, file, rule.as_deref(), *compact),
        Commands::Tree { file, rule } => cmd_tree(cli, file, rule.as_deref()),
        Commands::Parse { notation } => cmd_parse(cli, notation),
        Commands::Config { command } => match command {
            ConfigCommands::Show { file } => cmd_config_show(cli, file.as_deref()),
            ConfigCommands::Init { global, force } => cmd_config_init(*global, *force),
            ConfigCommands::Path => cmd_config_path(cli),
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "syndoc", &mut io::stdout());
            Ok(())
        }
    }
}

/// Container with settings layered for the document at `file`.
fn container_for(file: &Path) -> CliResult<ServiceContainer> {
    let settings = Settings::load(file.parent())?;
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

/// Load and compile a document, optionally narrowed to one rule.
fn compile(
    container: &ServiceContainer,
    file: &Path,
    rule: Option<&str>,
) -> CliResult<Vec<CompiledRule>> {
    let doc = container.documents.load(file)?;
    let compiled = container.documents.compile(&doc)?;
    match rule {
        Some(name) => Ok(container.documents.select(compiled, name)?),
        None => Ok(compiled),
    }
}

/// Write command output to `--output` or stdout.
fn emit(cli: &Cli, container: &ServiceContainer, text: &str) -> CliResult<()> {
    match &cli.output {
        Some(path) => {
            let content = format!("{text}\n");
            container
                .fs
                .write(path, &content)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            debug!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_check(cli: &Cli, file: &Path) -> CliResult<()> {
    let container = container_for(file)?;
    let doc = container.documents.load(file)?;
    let diagnostics = container.documents.check(&doc);
    let total = doc.rules.iter().filter(|r| r.syntax.is_some()).count();

    if cli.output.is_some() {
        emit(cli, &container, &check_report(file, total, &diagnostics))?;
    } else if diagnostics.is_empty() {
        output::success(&format!("{}: {} rules ok", file.display(), total));
    } else {
        for diagnostic in &diagnostics {
            output::failure(&diagnostic.rule);
            for line in diagnostic.error.to_string().lines() {
                output::detail(line);
            }
        }
    }

    if diagnostics.is_empty() {
        return Ok(());
    }
    Err(CliError::CheckFailed {
        failed: diagnostics.len(),
        total,
    })
}

/// Plain-text check report for `--output`: one block per failing rule.
fn check_report(file: &Path, total: usize, diagnostics: &[RuleDiagnostic]) -> String {
    if diagnostics.is_empty() {
        return format!("{}: {} rules ok", file.display(), total);
    }
    diagnostics
        .iter()
        .map(|diagnostic| {
            let detail = diagnostic
                .error
                .to_string()
                .lines()
                .map(|line| format!("  {line}"))
                .join("\n");
            format!("{}\n{}", diagnostic.rule, detail)
        })
        .join("\n")
}

#[instrument(skip(cli))]
fn cmd_ebnf(cli: &Cli, file: &Path, rule: Option<&str>, prefix: Option<&str>) -> CliResult<()> {
    let container = container_for(file)?;
    let compiled = compile(&container, file, rule)?;
    let listing = &container.settings.listing;
    let text = container.documents.render_listing(
        &compiled,
        prefix.unwrap_or(&listing.prefix),
        &listing.separator,
    );
    emit(cli, &container, &text)
}

#[instrument(skip(cli))]
fn cmd_diagram(cli: &Cli, file: &Path, rule: Option<&str>, compact: bool) -> CliResult<()> {
    let container = container_for(file)?;
    let compiled = compile(&container, file, rule)?;
    let settings = &container.settings.diagram;
    let diagrams = container
        .documents
        .diagrams(&compiled, &settings.anchor_prefix);

    let json = if settings.pretty && !compact {
        serde_json::to_string_pretty(&diagrams)
    } else {
        serde_json::to_string(&diagrams)
    }
    .map_err(|e| ApplicationError::OperationFailed {
        context: "serialize diagram model".into(),
        source: Box::new(e),
    })?;
    emit(cli, &container, &json)
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, file: &Path, rule: Option<&str>) -> CliResult<()> {
    let container = container_for(file)?;
    let compiled = compile(&container, file, rule)?;
    let blocks: Vec<String> = compiled
        .iter()
        .filter_map(|rule| {
            let syntax = rule.syntax.as_ref()?;
            Some(format!("{}\n{}", rule.name, syntax.to_term_tree()))
        })
        .collect();
    emit(cli, &container, blocks.join("\n").trim_end())
}

#[instrument(skip(cli))]
fn cmd_parse(cli: &Cli, notation: &str) -> CliResult<()> {
    let source = if notation == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| InfraError::io("read notation from stdin", e))?;
        buf.trim_end_matches(&['\r', '\n'][..]).to_string()
    } else {
        notation.to_string()
    };

    let node = parse(&source).map_err(|e| ApplicationError::Domain(DomainError::Syntax(e)))?;
    let container = ServiceContainer::new(Settings::default());
    emit(cli, &container, &to_text(&node, false))
}

fn cmd_config_show(cli: &Cli, file: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load(file.and_then(Path::parent))?;
    let text = settings.to_toml()?;
    let container = ServiceContainer::new(settings);
    emit(cli, &container, text.trim_end())
}

fn cmd_config_path(cli: &Cli) -> CliResult<()> {
    let global = global_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unavailable)".into());
    let local = local_config_path(Path::new("."));
    let text = format!("global: {}\nlocal:  {}", global, local.display());
    let container = ServiceContainer::new(Settings::default());
    emit(cli, &container, &text)
}

fn cmd_config_init(global: bool, force: bool) -> CliResult<()> {
    let path: PathBuf = if global {
        global_config_path()
            .ok_or_else(|| CliError::Usage("cannot determine global config directory".into()))?
    } else {
        local_config_path(Path::new("."))
    };

    let container = ServiceContainer::new(Settings::default());
    if container.fs.exists(&path) && !force {
        return Err(CliError::Usage(format!(
            "config file exists: {} (use --force to overwrite)",
            path.display()
        )));
    }

    container
        .fs
        .write(&path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}
