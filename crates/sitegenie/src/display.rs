//! Display - terminal rendering for SiteGenie
//!
//! Every line the user sees goes through here so chat output stays
//! consistent between the interactive loop and one-shot commands.

use owo_colors::OwoColorize;
use sitegenie_common::{ColorMode, Conversation, Role, Turn};
use std::io::{self, Write};

pub const TITLE: &str = "🏗️  SiteGenie";
pub const TAGLINE: &str =
    "Ask me anything about construction. I will only answer construction-related queries.";
pub const PROMPT: &str = "Type your construction query...";

/// Terminal output with optional color
#[derive(Debug, Clone, Copy)]
pub struct Ui {
    color: bool,
}

impl Ui {
    pub fn new(mode: ColorMode) -> Self {
        let color = match mode {
            ColorMode::Auto => console::colors_enabled(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        };
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn banner(&self) {
        println!();
        if self.color {
            println!("{}", TITLE.bold().yellow());
        } else {
            println!("{}", TITLE);
        }
        println!("{}", TAGLINE);
        println!("Type /help for commands.");
        println!();
    }

    pub fn help(&self) {
        println!("  /clear     delete the saved conversation and start over");
        println!("  /history   show the conversation again");
        println!("  /help      show this list");
        println!("  /exit      leave (Ctrl-D works too)");
        println!();
    }

    pub fn prompt(&self) {
        if self.color {
            print!("{} ", format!("{} ›", PROMPT).dimmed());
        } else {
            print!("{} › ", PROMPT);
        }
        let _ = io::stdout().flush();
    }

    /// Render every turn except the synthesized system turn
    pub fn scrollback(&self, conversation: &Conversation) {
        for turn in conversation.visible() {
            self.turn(turn);
        }
    }

    pub fn turn(&self, turn: &Turn) {
        println!("{}", self.format_turn(turn));
        println!();
    }

    pub fn format_turn(&self, turn: &Turn) -> String {
        let label = match turn.role {
            Role::User => "you",
            Role::Assistant => "genie",
            Role::System => "system",
        };

        let header = if !self.color {
            format!("[{}]", label)
        } else {
            match turn.role {
                Role::User => format!("[{}]", label).cyan().bold().to_string(),
                Role::Assistant => format!("[{}]", label).green().bold().to_string(),
                Role::System => format!("[{}]", label).magenta().to_string(),
            }
        };

        format!("{} {}", header, turn.content)
    }

    pub fn info(&self, msg: &str) {
        if self.color {
            println!("{}", msg.blue());
        } else {
            println!("{}", msg);
        }
    }

    pub fn warning(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", "⚠".yellow(), msg.yellow());
        } else {
            eprintln!("WARNING: {}", msg);
        }
    }

    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", "✗".red(), msg.red());
        } else {
            eprintln!("ERROR: {}", msg);
        }
    }

    /// Wipe the terminal before a fresh render. No-op when not a terminal.
    pub fn clear_screen(&self) {
        let term = console::Term::stdout();
        if term.is_term() {
            if let Err(e) = term.clear_screen() {
                tracing::debug!("Could not clear screen: {}", e);
            }
        }
    }
}
