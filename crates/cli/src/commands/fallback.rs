//! `talker fallback`: Answer a fallback for a recorded event log.

use std::path::Path;

use talker_agent::{FallbackAction, HistoryExtractor};
use talker_config::AppConfig;

pub async fn run(events: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let log = super::load_events(events)?;

    let talker = super::build_talker(&config).await?;
    let action = FallbackAction::new(talker)
        .with_extractor(HistoryExtractor::new(config.fallback.action_name.clone()));

    let outcome = action.run(&log).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
