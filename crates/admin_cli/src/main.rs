mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod prompt;
mod render;

use std::process::ExitCode;

use clap::Parser;
use client::{Client, Session, TokenStore};

use crate::{
    cli::Cli,
    commands::Context,
    error::{AdminError, Result},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if err.is_auth_failure() {
                eprintln!("hint: run `carbonboard_admin login` first");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load(&cli.global)?;
    logging::init(&config.log_level)?;
    tracing::debug!(base_url = %config.base_url, token_path = %config.token_path, "loaded config");

    let store = TokenStore::new(&config.token_path);
    let session = match Session::restore(store.clone()) {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(path = %store.path().display(), "unreadable session file, discarding: {err}");
            store.clear()?;
            Session::restore(store)?
        }
    };
    let client = Client::new(&config.base_url, session)?;
    let ctx = Context {
        client,
        config,
        json: cli.global.json,
    };

    let result = commands::execute(&ctx, cli.command).await;
    if let Err(err) = &result {
        expire_on_auth_failure(&ctx, err);
    }
    result
}

/// A rejected token is useless: forget it so the next run starts clean.
fn expire_on_auth_failure(ctx: &Context, err: &AdminError) {
    if !err.is_auth_failure() {
        return;
    }
    tracing::warn!("session rejected by the server, clearing stored token");
    if let Err(err) = ctx.client.session().clear() {
        tracing::warn!("failed to clear stored token: {err}");
    }
}
