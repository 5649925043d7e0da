mod auth;
mod config;
mod driver;
mod net;
mod tui;

use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use futures_util::StreamExt;

use auth::{prompt_credentials, AuthClient, AuthSession};
use config::ClientConfig;
use driver::{run_session, SessionOutcome};

#[derive(Parser)]
#[command(name = "pong")]
#[command(about = "Terminal client for two-player pong")]
struct Args {
    #[arg(long, default_value = config::DEFAULT_API_BASE, help = "Base URL of the HTTP API")]
    api_base: String,

    #[arg(long, default_value = config::DEFAULT_WS_URL, help = "WebSocket endpoint")]
    ws_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = ClientConfig {
        api_base: args.api_base,
        ws_url: args.ws_url,
        ..Default::default()
    };

    let auth = AuthClient::new(config.api_base.clone());
    let session = login_loop(&auth).await?;

    loop {
        let outcome = match run_session(&config, &session.cookie).await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                eprintln!("Unable to start a game: {err:#}");
                None
            }
        };

        match prompt_restart(outcome.as_ref()).await? {
            PromptChoice::Restart => continue,
            PromptChoice::Quit => break,
        }
    }

    match auth.logout(&session).await {
        Ok(()) => println!("Logged out successfully."),
        Err(err) => log::warn!("logout failed: {err}"),
    }
    Ok(())
}

/// Prompt for credentials until the server accepts them. Bad credentials are
/// reported and retried, never fatal.
async fn login_loop(auth: &AuthClient) -> Result<AuthSession> {
    loop {
        let credentials = prompt_credentials()?;
        match auth.login(&credentials).await {
            Ok(session) => {
                println!("Logged in successfully");
                return Ok(session);
            }
            Err(err) => {
                eprintln!("Login failed: {err}");
                println!("Please try again.");
            }
        }
    }
}

enum PromptChoice {
    Restart,
    Quit,
}

/// End-of-match prompt: Enter starts a new session, `q` quits.
async fn prompt_restart(outcome: Option<&SessionOutcome>) -> io::Result<PromptChoice> {
    match outcome {
        Some(outcome) => println!("{}", outcome.message()),
        None => println!("Unable to start a game"),
    }
    println!("Press [Enter] to start a new game or [q] to quit.");

    terminal::enable_raw_mode()?;
    let mut keys = EventStream::new();
    let choice = loop {
        let Some(event) = keys.next().await else {
            break PromptChoice::Quit;
        };
        let Event::Key(key) = event? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            break PromptChoice::Quit;
        }
        match key.code {
            KeyCode::Enter => break PromptChoice::Restart,
            KeyCode::Char('q') => break PromptChoice::Quit,
            _ => {}
        }
    };
    terminal::disable_raw_mode()?;
    Ok(choice)
}
