//! `talker shell`: Interactive chat in the terminal.
//!
//! The whole dialog so far is the model's context on every turn; the
//! truncator keeps it within the model's budget.

use std::io::Write;

use talker_agent::Talker;
use talker_config::AppConfig;
use talker_core::message::Utterance;
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(greeting: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let talker = super::build_talker(&config).await?;

    println!();
    println!("  Model:     {}", config.model.name);
    println!("  Context:   {} tokens", config.context.max_context_length);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or an empty line to quit.");
    println!();

    let mut dialog: Vec<Utterance> = Vec::new();

    if let Some(opening) = greeting.or_else(|| config.fallback.greeting.clone()) {
        println!("  usr: {opening}");
        exchange(&talker, &mut dialog, opening).await;
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        print!("  usr: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF (Ctrl+D)
        };
        let line = line.trim().to_string();
        if line.is_empty() || matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit") {
            break;
        }

        exchange(&talker, &mut dialog, line).await;
    }

    println!();
    Ok(())
}

/// Add the user's line, generate the reply, and keep the dialog alternating.
async fn exchange(talker: &Talker, dialog: &mut Vec<Utterance>, text: String) {
    dialog.push(Utterance::user(text));

    match talker.respond(dialog).await {
        Ok(response) => {
            println!("  bot: {response}");
            dialog.push(Utterance::bot(response));
        }
        Err(e) => {
            eprintln!("  [Error] {e}");
            dialog.pop();
        }
    }
}
