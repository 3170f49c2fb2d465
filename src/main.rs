mod apps;
mod cli;
mod common;
mod config;
mod directory;
mod error;
mod utils;

use apps::SystemRegistry;
use cli::Cmd;
use common::{app_table, show_app};
use config::Config;
use directory::Directory;
use error::Result;

use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;
use std::io::Write;

#[mutants::skip] // Cannot test directly at the moment
fn main() -> Result<()> {
    CompleteEnv::with_factory(|| Cmd::command().name("launchr"))
        .completer("launchr")
        .complete();

    let config = Config::new()?;
    let mut stdout = std::io::stdout().lock();

    let directory =
        Directory::attach(Some(SystemRegistry::populate(&config.file)?));

    let res = match Cmd::parse() {
        Cmd::Check { id, json } => directory
            .check_availability(&id)
            .and_then(|app| show_app(&mut stdout, &app, json)),
        Cmd::List { query, json, icons } => {
            // Icons only ever show up in json output
            let icons = json && (icons || config.file.include_icons);
            let apps = match query {
                Some(query) => {
                    directory.installed_apps_by_query(&query, icons)
                }
                None => directory.installed_apps(icons),
            };
            app_table(&mut stdout, &apps, json, config.terminal_output)
        }
        Cmd::Enabled { id } => directory.is_app_enabled(&id).and_then(
            |enabled| {
                writeln!(stdout, "{enabled}")?;
                Ok(())
            },
        ),
        Cmd::Launch { id } => directory.launch_app(&id),
    };

    // Issue a notification if launchr is not being run in a terminal
    if let Err(ref e) = res {
        if !config.terminal_output {
            utils::notify("launchr error", &e.to_string())?
        }
    }

    res
}
