//! `crewroster` - CLI for the pilot training roster
//!
//! Without a subcommand this binary runs the interactive roster menu. The
//! other subcommands inspect saved rosters and the configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use crewroster::cli::{Cli, Command, ConfigCommand, ShowCommand};
use crewroster::console::{render_grid, BANNER};
use crewroster::record::Field;
use crewroster::view::{self, Column};
use crewroster::{init_logging, App, Config, Error, TerminalConsole};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let load_config = || -> anyhow::Result<Config> {
        let mut config = Config::load_from(cli.config.clone())
            .context("could not load the crewroster configuration")?;
        if let Some(dir) = &cli.data_dir {
            config.storage.data_dir = Some(dir.clone());
        }
        Ok(config)
    };

    match cli.resolved_command() {
        Command::Run => handle_run(load_config()?),
        Command::Rosters => handle_rosters(&load_config()?),
        Command::Show(show_cmd) => handle_show(&load_config()?, show_cmd),
        Command::Config(ConfigCommand::Path) => {
            println!("{}", Config::default_config_path().display());
            Ok(())
        }
        Command::Config(ConfigCommand::Validate { file }) => {
            handle_validate(file.clone().or_else(|| cli.config.clone()));
            Ok(())
        }
        Command::Config(ConfigCommand::Show { json }) => handle_config_show(&load_config()?, *json),
    }
}

fn handle_run(config: Config) -> anyhow::Result<()> {
    let console = TerminalConsole::stdio(config.ui.clear_screen);
    let mut app = App::new(config, console)?;

    match app.run() {
        Ok(()) | Err(Error::InputClosed) => {
            println!("Program terminated. Thank you for using {BANNER}");
            Ok(())
        }
        Err(err) => Err(err).context("the roster session stopped"),
    }
}

fn handle_rosters(config: &Config) -> anyhow::Result<()> {
    let store = config.roster_store()?;
    let files = store.list()?;
    if files.is_empty() {
        println!("No saved rosters in {}", store.dir().display());
        return Ok(());
    }
    println!("Saved rosters in {}:", store.dir().display());
    for file in files {
        println!("  {file}");
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let store = config.roster_store()?;
    let saved = store
        .read(&cmd.file)
        .with_context(|| format!("could not read roster {}", cmd.file))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
        return Ok(());
    }

    // Only fields every record carries get a column.
    let shared: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|field| !field.is_mandatory())
        .filter(|field| saved.records().iter().all(|r| r.is_present(*field)))
        .collect();
    let columns = Column::layout(&shared);
    let rows = saved
        .records()
        .iter()
        .map(|record| view::row(record, &columns))
        .collect::<Result<Vec<_>, _>>()?;

    let counters = saved.counters();
    println!(
        "{}: {} pilots, current pid sequence {}",
        cmd.file,
        counters.live_count(),
        counters.next_id()
    );
    println!("{}", render_grid(&view::headers(&columns), &rows));
    Ok(())
}

fn handle_validate(file: Option<std::path::PathBuf>) {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
}

fn handle_config_show(config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    let tracked: Vec<String> = config
        .roster
        .tracked_fields
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Roster]");
    println!("  Capacity:           {}", config.roster.capacity);
    println!("  Page size:          {}", config.roster.page_size);
    println!("  Tracked fields:     {}", tracked.join(", "));
    println!();
    println!("[Storage]");
    println!("  Data directory:     {}", config.data_dir().display());
    println!("  File extension:     {}", config.storage.extension);
    println!();
    println!("[UI]");
    println!("  Clear screen:       {}", config.ui.clear_screen);
    Ok(())
}
