//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{OutlineForest, OutlineReader, TraversalOrder};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{RenderStyle, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = cli.config_dir.clone().or_else(|| std::env::current_dir().ok());
    let config_dir = config_dir.as_deref();

    match &cli.command {
        Some(Commands::Render { file, style }) => render(config_dir, file, *style),
        Some(Commands::Walk { file, order }) => walk(config_dir, file, (*order).into()),
        Some(Commands::Path { file, from, to }) => path(config_dir, file, from, to),
        Some(Commands::Stats { file }) => stats(config_dir, file),
        Some(Commands::Config { command }) => config(config_dir, command),
        Some(Commands::Completion { shell }) => {
            completion(*shell);
            Ok(())
        }
        None if cli.info => Ok(()),
        None => Err(CliError::Usage(
            "no command given, see `arbor --help`".to_string(),
        )),
    }
}

fn read(settings: &Settings, file: &Path) -> CliResult<OutlineForest> {
    let reader = OutlineReader::new(settings.render.outline_style());
    let parsed = reader.read_file(file)?;
    if parsed.roots.is_empty() {
        output::warning(&format!("{}: no nodes", file.display()));
    }
    Ok(parsed)
}

#[instrument]
fn render(config_dir: Option<&Path>, file: &Path, style: Option<RenderStyle>) -> CliResult<()> {
    let settings = Settings::load(config_dir)?;
    let parsed = read(&settings, file)?;
    let style = style.unwrap_or(settings.render.style);
    debug!(?style, "rendering");

    let text = match style {
        RenderStyle::Outline => parsed.render_outline(&settings.render.outline_style()),
        RenderStyle::Tree => parsed.render_tree(),
    };
    output::block(&text);
    Ok(())
}

#[instrument]
fn walk(config_dir: Option<&Path>, file: &Path, order: TraversalOrder) -> CliResult<()> {
    let settings = Settings::load(config_dir)?;
    let parsed = read(&settings, file)?;
    for values in parsed.walk(order) {
        output::info(&values.iter().join(" "));
    }
    Ok(())
}

#[instrument]
fn path(config_dir: Option<&Path>, file: &Path, from: &str, to: &str) -> CliResult<()> {
    let settings = Settings::load(config_dir)?;
    let parsed = read(&settings, file)?;
    let path = parsed.path(from, to)?;
    output::info(&path.iter().join(" -> "));
    Ok(())
}

#[instrument]
fn stats(config_dir: Option<&Path>, file: &Path) -> CliResult<()> {
    let settings = Settings::load(config_dir)?;
    let parsed = read(&settings, file)?;
    for tree in parsed.stats() {
        output::header(&tree.root);
        output::field("nodes", &tree.nodes);
        output::field("depth", &tree.depth);
        output::field("leaves", &tree.leaves);
    }
    Ok(())
}

#[instrument]
fn config(config_dir: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config_dir)?;
            output::block(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::block(&Settings::template()),
    }
    Ok(())
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
