//! Interactive line loop.
//!
//! Reads stdin line by line. Plain lines are sent as typed input; lines
//! starting with `/` are client commands.

use std::io::Write;

use parley_chat::{ChatSession, SendOptions, SendOutcome};
use parley_core::PlatformIntent;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::{render_history, render_turn};

const HELP: &str = "\
Type a message and press Enter to send it.
  /N, /pick N   click suggestion N of the latest reply
  /search P [T] search platform P (google, youtube, wikipedia) and keep it
  /history      show the whole conversation
  /intent       show the remembered search platform
  /help         show this help
  /quit         leave (Ctrl-D works too)";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text to send as the pending input.
    Send(String),
    /// Zero-based suggestion index.
    Pick(usize),
    /// Platform command: send `text` on `intent` and remember the platform.
    Search { intent: PlatformIntent, text: String },
    History,
    Intent,
    Help,
    Quit,
    Unknown(String),
    /// A known command with a bad argument.
    Invalid(String),
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    match name {
        "quit" | "exit" | "q" => Command::Quit,
        "help" | "?" => Command::Help,
        "history" => Command::History,
        "intent" => Command::Intent,
        "pick" => parse_chip_number(parts.next().unwrap_or_default(), trimmed),
        "search" => parse_search(parts.next().unwrap_or_default(), parts),
        _ => parse_chip_number(name, trimmed),
    }
}

/// Chips are numbered from 1 on screen.
fn parse_chip_number(number: &str, line: &str) -> Command {
    match number.parse::<usize>() {
        Ok(n) if n > 0 => Command::Pick(n - 1),
        _ => Command::Unknown(line.to_string()),
    }
}

fn parse_search<'a>(platform: &str, words: impl Iterator<Item = &'a str>) -> Command {
    match platform.parse::<PlatformIntent>() {
        Ok(intent) => Command::Search {
            intent,
            text: words.collect::<Vec<_>>().join(" "),
        },
        Err(e) => {
            let names: Vec<&str> = PlatformIntent::ALL.iter().map(|p| p.as_str()).collect();
            Command::Invalid(format!("{} (choose {})", e, names.join(", ")))
        }
    }
}

/// Run the loop until `/quit` or end of input.
pub async fn run(session: &ChatSession) -> std::io::Result<()> {
    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Send(text) => {
                session.set_input(text);
                let before = session.turn_count();
                let outcome = session.send(None, SendOptions::default()).await;
                print_new_turns(session, before, outcome);
            }
            Command::Pick(index) => {
                let before = session.turn_count();
                match session.pick_suggestion(index).await {
                    Some(outcome) => print_new_turns(session, before, outcome),
                    None => println!("No suggestion {} on the latest reply.", index + 1),
                }
            }
            Command::Search { intent, text } => {
                let before = session.turn_count();
                let options = SendOptions {
                    intent_override: Some(intent),
                    persist_intent: true,
                    ..SendOptions::default()
                };
                let outcome = session.send(Some(&text), options).await;
                print_new_turns(session, before, outcome);
            }
            Command::History => println!("{}", render_history(&session.history())),
            Command::Intent => match session.current_intent() {
                Some(intent) => println!("Searching on {} until you type a new search.", intent),
                None => println!("No search platform remembered."),
            },
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(line) => println!("Unknown command: {} (try /help)", line),
            Command::Invalid(message) => println!("{}", message),
        }
    }

    tracing::debug!(turns = session.turn_count(), "session ended");
    Ok(())
}

/// Print the turns a send appended, if any.
pub fn print_new_turns(session: &ChatSession, before: usize, outcome: SendOutcome) {
    if !outcome.dispatched() {
        return;
    }
    for turn in session.history().iter().skip(before) {
        println!("{}", render_turn(turn));
    }
}
