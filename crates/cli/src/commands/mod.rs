//! Subcommand implementations.

pub mod config_cmd;
pub mod context;
pub mod fallback;
pub mod shell;

use std::path::Path;

use talker_agent::Talker;
use talker_config::AppConfig;
use talker_core::event::EventLog;

/// Read and parse a tracker event list.
pub fn load_events(path: &Path) -> Result<EventLog, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read event log {}: {e}", path.display()))?;
    let log = EventLog::from_json(&json)
        .map_err(|e| format!("Invalid event log {}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), events = log.len(), "Loaded event log");
    Ok(log)
}

/// Build a talker from the configured tokenizer and local model.
#[cfg(feature = "local")]
pub async fn build_talker(config: &AppConfig) -> Result<Talker, Box<dyn std::error::Error>> {
    use talker_agent::SeparatorEncoder;

    let owned = config.clone();
    let (tokenizer, generator) =
        tokio::task::spawn_blocking(move || talker_providers::build_from_config(&owned))
            .await??;

    let encoder = Box::new(SeparatorEncoder::new(config.context.separator.clone()));
    Ok(Talker::new(tokenizer, generator)
        .with_encoder(encoder)
        .with_params(config.generation.clone()))
}

#[cfg(not(feature = "local"))]
pub async fn build_talker(_config: &AppConfig) -> Result<Talker, Box<dyn std::error::Error>> {
    Err("talker was built without a model backend; rebuild with `--features local`".into())
}
