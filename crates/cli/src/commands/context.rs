//! `talker context`: Show what the model would see for a fallback.

use std::path::Path;

use talker_agent::{HistoryExtractor, assemble};
use talker_config::AppConfig;

pub async fn run(events: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let log = super::load_events(events)?;

    let extractor = HistoryExtractor::new(config.fallback.action_name.clone());
    let window = extractor.extract_window(log.events());
    let history = window
        .as_ref()
        .map(|(_, utterances)| utterances.as_slice())
        .unwrap_or_default();
    let conversation = assemble(history)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
        return Ok(());
    }

    println!();
    println!("  Events:    {}", log.len());
    println!("  Fallback:  {}", extractor.fallback_action());
    match &window {
        Some((start, _)) => println!("  Window:    from event #{start}"),
        None => println!("  Window:    empty (no eligible user turn)"),
    }
    println!();

    for turn in &conversation.turns {
        let status = if turn.finalized { "" } else { "  (pending)" };
        println!("  {:>4} > {}{status}", turn.role.to_string(), turn.text);
    }
    println!();

    Ok(())
}
