//! Terminal chat client for one room.
//!
//! Demonstrates:
//! - Opening a session with the builder
//! - Following snapshots as players join, leave, and chat
//! - Posting messages read from stdin
//! - Closing on end of input or Ctrl+C
//!
//! Usage:
//!   cargo run --example chat -- ROOM_ID
//!   cargo run --example chat -- ROOM_ID --name Alice
//!   cargo run --example chat -- ROOM_ID --endpoint ws://game.example:8000 --debug

// ============================================================================
// Imports
// ============================================================================

use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use room_session::{ConnectionStatus, PlayerId, PlayerIdentity, Session, SessionState};

// ============================================================================
// Args
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    room: Option<String>,
    name: Option<String>,
    endpoint: Option<String>,
    debug: bool,
}

impl Args {
    fn parse() -> Self {
        let mut args = Self {
            room: None,
            name: None,
            endpoint: None,
            debug: false,
        };

        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" => args.debug = true,
                "--name" => args.name = iter.next(),
                "--endpoint" => args.endpoint = iter.next(),
                _ => args.room = Some(arg),
            }
        }

        args
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "room_session=debug"
    } else {
        "room_session=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let Some(room) = args.room else {
        bail!("usage: chat ROOM_ID [--name NAME] [--endpoint URL] [--debug]");
    };

    let identity = match args.name {
        Some(name) => PlayerIdentity::new(PlayerId::generate(), name),
        None => PlayerIdentity::anonymous(),
    };

    let mut builder = Session::builder().room(room).identity(identity);
    if let Some(endpoint) = args.endpoint {
        builder = builder.endpoint(endpoint);
    }

    let session = builder.open().context("failed to open session")?;
    println!(
        "=== Room {} as {} ===\n",
        session.target().room_id(),
        session.identity().player_name
    );

    let mut updates = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = SessionState::new();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                render(&shown, &snapshot);
                if snapshot.status == ConnectionStatus::Disconnected {
                    break;
                }
                shown = (*snapshot).clone();
            }

            line = lines.next_line() => {
                match line.context("failed to read stdin")? {
                    Some(text) if !text.trim().is_empty() => session.send_message(text),
                    Some(_) => {}
                    None => break,
                }
            }

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.close();
    println!("\n=== Left room ===");
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

/// Prints what changed between two snapshots.
fn render(before: &SessionState, after: &SessionState) {
    if before.status != after.status {
        println!("[{}]", after.status);
    }

    for player in &after.players {
        if !before.has_player(&player.player_id) {
            println!("+ {} joined", player.player_name);
        }
    }

    for player in &before.players {
        if !after.has_player(&player.player_id) {
            println!("- {} left", player.player_name);
        }
    }

    // A full sync may replace history, so only print the new tail.
    let start = if after.messages.starts_with(&before.messages) {
        before.messages.len()
    } else {
        0
    };

    for message in &after.messages[start..] {
        println!("<{}> {}", message.player_name, message.text);
    }
}
