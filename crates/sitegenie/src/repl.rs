//! REPL - interactive chat loop
//!
//! Reconciles with the store once at start, renders the saved conversation,
//! then handles one line at a time. `/clear` halts the current pass and
//! redraws from a clean state.

use anyhow::Result;
use sitegenie_common::{ChatSession, MessageStore, ModelGateway, ReplySource, Turn, TurnOutcome};
use std::io::BufRead;
use tracing::debug;

use crate::display::Ui;

/// One line of user input, interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Message(String),
    Clear,
    History,
    Help,
    Exit,
    /// Slash command we don't know; not sent to the model
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }

    if !trimmed.starts_with('/') {
        return Input::Message(line.trim_end_matches(['\r', '\n']).to_string());
    }

    match trimmed.to_lowercase().as_str() {
        "/clear" | "/reset" => Input::Clear,
        "/history" => Input::History,
        "/help" | "/?" => Input::Help,
        "/exit" | "/quit" | "/q" => Input::Exit,
        _ => Input::Unknown(trimmed.to_string()),
    }
}

/// Start the interactive chat on stdin
pub fn start_repl<G>(store: &MessageStore, gateway: &G, ui: &Ui) -> Result<()>
where
    G: ModelGateway + ?Sized,
{
    let stdin = std::io::stdin();
    run_repl_loop(stdin.lock(), store, gateway, ui)
}

/// Main loop, generic over the input source
pub fn run_repl_loop<R, G>(input: R, store: &MessageStore, gateway: &G, ui: &Ui) -> Result<()>
where
    R: BufRead,
    G: ModelGateway + ?Sized,
{
    let (mut session, load_error) = ChatSession::start(store, gateway);
    if let Some(e) = load_error {
        ui.warning(&format!(
            "Chat history unavailable ({}). This session will not be saved.",
            e
        ));
    }

    ui.banner();
    ui.scrollback(session.conversation());

    let mut lines = input.lines();
    loop {
        ui.prompt();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                ui.error(&format!("Error reading input: {}", e));
                continue;
            }
            None => {
                println!();
                break;
            }
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Exit => break,
            Input::Help => ui.help(),
            Input::History => {
                println!();
                ui.scrollback(session.conversation());
            }
            Input::Unknown(cmd) => {
                ui.warning(&format!("Unknown command {}. Type /help for commands.", cmd));
            }
            Input::Clear => match session.reset() {
                Ok(()) => {
                    // Nothing else from this pass is rendered
                    ui.clear_screen();
                    ui.banner();
                    ui.info("Chat history cleared.");
                    println!();
                    continue;
                }
                Err(e) => ui.error(&format!("Could not clear chat history: {}", e)),
            },
            Input::Message(text) => {
                let outcome = session.submit(&text);
                render_outcome(ui, &outcome);
            }
        }
    }

    debug!(
        "Chat ended with {} turns in memory",
        session.conversation().visible().len()
    );
    Ok(())
}

/// Show the reply for one turn plus anything that went wrong producing it
pub fn render_outcome(ui: &Ui, outcome: &TurnOutcome) {
    println!();
    if let ReplySource::GatewayFailed(e) = &outcome.source {
        ui.error(&format!("Model error: {}", e));
    }
    ui.turn(&Turn::assistant(outcome.reply.clone()));
    for e in &outcome.storage_errors {
        ui.warning(&format!("Not saved: {}", e));
    }
}
