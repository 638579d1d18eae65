//! Command dispatch: load settings, drive the editor, render the result

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{Editor, Script, ScriptReport, DEMO_SCRIPT};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::tree_view::ToTermTree;
use crate::config::{global_config_path, Settings, LOCAL_CONFIG_FILE};
use crate::util::path::expand_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Run { script, no_log }) => cmd_run(cli, script, *no_log),
        Some(Commands::Demo { no_log }) => cmd_demo(cli, *no_log),
        Some(Commands::Tree) => cmd_tree(cli),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            cmd_completion(*shell);
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `branchtree --help`".into(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let local = cli.config.as_deref().map(expand_path);
    debug!("local config: {:?}", local);
    Ok(Settings::load(local.as_deref())?)
}

#[instrument(skip(cli))]
fn cmd_run(cli: &Cli, script: &Path, no_log: bool) -> CliResult<()> {
    let path = expand_path(script);
    if !path.is_file() {
        return Err(CliError::InvalidArgs(format!(
            "script not found: {}",
            path.display()
        )));
    }
    let script = Script::load(&path)?;
    replay(cli, &script, no_log)
}

#[instrument(skip(cli))]
fn cmd_demo(cli: &Cli, no_log: bool) -> CliResult<()> {
    let script = Script::parse(DEMO_SCRIPT)?;
    replay(cli, &script, no_log)
}

fn cmd_tree(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let editor = Editor::new(settings.layout)?;
    output::info(&editor.to_term_tree());
    Ok(())
}

fn replay(cli: &Cli, script: &Script, no_log: bool) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let mut editor = Editor::new(settings.layout)?;
    let report = script.run(&mut editor)?;
    print_session(&editor, &report, no_log);
    Ok(())
}

fn print_session(editor: &Editor, report: &ScriptReport, no_log: bool) {
    if !no_log {
        output::header("Log");
        for entry in editor.log().entries() {
            output::detail(entry);
        }
        println!();
    }

    output::header("Tree");
    output::info(&editor.to_term_tree());
    println!();

    output::action("Selection", &editor.describe_selection());
    output::success(&format!(
        "{} operations applied, {} branches, {} nodes",
        report.applied,
        editor.store().branch_count(),
        editor.store().node_count()
    ));
    if report.skipped > 0 {
        output::warning(&format!(
            "{} operations skipped (not applicable)",
            report.skipped
        ));
    }
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::action("Global", "(no home directory)"),
            }
            match cli.config.as_deref() {
                Some(path) => output::action("Local", &expand_path(path).display()),
                None => output::action("Local", LOCAL_CONFIG_FILE),
            }
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
