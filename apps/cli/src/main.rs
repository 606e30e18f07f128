mod cli;
mod commands;
mod config;
mod main_lib;
mod render;

use clap::Parser;

use cli::{Cli, Command};
use config::Config;
use main_lib::{build_context, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::from_env()?;
    init_tracing();

    let json = args.json;
    let context = || build_context(&config);
    match args.command {
        Command::Price { actions } => commands::price(&config.settings, &actions, json),
        Command::Create(create_args) => commands::create(&mut context()?, create_args, json).await,
        Command::Show { id } => commands::show(&mut context()?, &id, json).await,
        Command::Revise { id, actions } => {
            commands::revise(&mut context()?, &id, &actions, json).await
        }
        Command::Confirm { id, reference } => {
            commands::confirm(&mut context()?, &id, &reference, json).await
        }
        Command::Delete { id } => commands::delete(&mut context()?, &id).await,
        Command::Rate { from, to } => commands::rate(&context()?, &from, &to, json).await,
        Command::Client(command) => commands::client(&context()?, command, json).await,
    }
}
