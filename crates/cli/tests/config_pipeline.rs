//! End-to-end tests for the configuration-driven fallback pipeline.
//!
//! These tests wire the pipeline the way the CLI does: a TOML config and a
//! JSON event log on disk, a tokenizer and generator built around them.

use std::sync::{Arc, Mutex};

use talker_agent::{FallbackAction, HistoryExtractor, SeparatorEncoder, Talker, assemble};
use talker_config::AppConfig;
use talker_core::error::ProviderError;
use talker_core::event::{Event, EventLog};
use talker_core::generator::{GenerationParams, Generator};
use talker_core::token::{ContextWindow, TokenId, Tokenizer};

// ── Mock collaborators ──────────────────────────────────────────────────

const MARKER: TokenId = 0;

/// One token per char; the configured separator collapses to [`MARKER`].
struct CharTokenizer {
    separator: String,
    max_length: usize,
}

impl CharTokenizer {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            separator: config.context.separator.clone(),
            max_length: config.context.max_context_length,
        }
    }
}

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, ProviderError> {
        let mut ids = Vec::new();
        for (i, part) in text.split(self.separator.as_str()).enumerate() {
            if i > 0 {
                ids.push(MARKER);
            }
            ids.extend(part.chars().map(TokenId::from));
        }
        Ok(ids)
    }

    fn decode(&self, ids: &[TokenId]) -> Result<String, ProviderError> {
        let mut text = String::new();
        for &id in ids {
            if id == MARKER {
                text.push_str(&self.separator);
            } else {
                let c = char::from_u32(id)
                    .ok_or_else(|| ProviderError::Tokenization(format!("bad id {id}")))?;
                text.push(c);
            }
        }
        Ok(text)
    }

    fn boundary_marker(&self) -> TokenId {
        MARKER
    }

    fn max_context_length(&self) -> usize {
        self.max_length
    }
}

/// Replies with a fixed token sequence and records what it was asked.
struct RecordingGenerator {
    reply: Vec<TokenId>,
    windows: Mutex<Vec<ContextWindow>>,
    params: Mutex<Vec<GenerationParams>>,
}

impl RecordingGenerator {
    fn replying(tokenizer: &CharTokenizer, text: &str) -> Self {
        Self {
            reply: tokenizer.encode(text).unwrap(),
            windows: Mutex::new(Vec::new()),
            params: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Generator for RecordingGenerator {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(
        &self,
        window: &ContextWindow,
        params: &GenerationParams,
    ) -> Result<Vec<TokenId>, ProviderError> {
        self.windows.lock().unwrap().push(window.clone());
        self.params.lock().unwrap().push(params.clone());
        Ok(self.reply.clone())
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────

const CONFIG_TOML: &str = r#"
[context]
max_context_length = 64
separator = " | "

[generation]
num_beams = 4
min_length = 5
seed = 7

[fallback]
action_name = "action_talk"
"#;

const EVENT_LOG: &str = r#"[
    {"event": "action", "name": "action_listen"},
    {"event": "user", "text": "hi"},
    {"event": "bot", "text": "hello"},
    {"event": "user", "text": "what's up"},
    {"event": "action", "name": "action_talk"},
    {"event": "bot", "text": "not much"},
    {"event": "user", "text": "cool"},
    {"event": "action", "name": "action_talk"},
    {"event": "slot", "name": "mood", "value": "happy"}
]"#;

fn write_fixtures(dir: &tempfile::TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let config_path = dir.path().join("config.toml");
    let events_path = dir.path().join("events.json");
    std::fs::write(&config_path, CONFIG_TOML).unwrap();
    std::fs::write(&events_path, EVENT_LOG).unwrap();
    (config_path, events_path)
}

fn build_talker(config: &AppConfig, generator: Arc<RecordingGenerator>) -> Talker {
    let tokenizer: Arc<dyn Tokenizer> = Arc::new(CharTokenizer::from_config(config));
    let encoder = Box::new(SeparatorEncoder::new(config.context.separator.clone()));
    Talker::new(tokenizer, generator)
        .with_encoder(encoder)
        .with_params(config.generation.clone())
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn fallback_from_files_uses_configured_action_and_params() {
    let dir = tempfile::tempdir().unwrap();
    let (config_path, events_path) = write_fixtures(&dir);

    let config = AppConfig::load_from(&config_path).unwrap();
    let log = EventLog::from_json(&std::fs::read_to_string(&events_path).unwrap()).unwrap();
    assert_eq!(log.len(), 9);

    let tokenizer = CharTokenizer::from_config(&config);
    let generator = Arc::new(RecordingGenerator::replying(&tokenizer, "  oh   nice\tone "));
    let action = FallbackAction::new(build_talker(&config, generator.clone()))
        .with_extractor(HistoryExtractor::new(config.fallback.action_name.clone()));

    let outcome = action.run(&log).await.unwrap();
    assert_eq!(outcome.message.as_deref(), Some("oh nice one"));
    assert_eq!(outcome.events, vec![Event::UserUtteranceReverted]);

    let windows = generator.windows.lock().unwrap();
    let context = tokenizer.decode(windows[0].ids()).unwrap();
    assert_eq!(context, "what's up | not much | cool");

    let params = generator.params.lock().unwrap();
    assert_eq!(params[0].num_beams, 4);
    assert_eq!(params[0].min_length, 5);
    assert_eq!(params[0].seed, 7);
    assert_eq!(params[0].no_repeat_ngram_size, 3);
}

#[tokio::test]
async fn configured_budget_truncates_at_separator() {
    let dir = tempfile::tempdir().unwrap();
    let (config_path, events_path) = write_fixtures(&dir);

    let mut config = AppConfig::load_from(&config_path).unwrap();
    // "not much" + marker + "cool" is 13 tokens
    config.context.max_context_length = 14;
    let log = EventLog::from_json(&std::fs::read_to_string(&events_path).unwrap()).unwrap();

    let tokenizer = CharTokenizer::from_config(&config);
    let generator = Arc::new(RecordingGenerator::replying(&tokenizer, "ok"));
    let action = FallbackAction::new(build_talker(&config, generator.clone()))
        .with_extractor(HistoryExtractor::new(config.fallback.action_name.clone()));

    action.run(&log).await.unwrap();

    let windows = generator.windows.lock().unwrap();
    assert!(windows[0].is_truncated());
    assert_eq!(tokenizer.decode(windows[0].ids()).unwrap(), "not much | cool");
}

#[tokio::test]
async fn unrecognized_fallback_action_limits_window_to_latest_turn() {
    let dir = tempfile::tempdir().unwrap();
    let (_, events_path) = write_fixtures(&dir);

    let config = AppConfig::default();
    let log = EventLog::from_json(&std::fs::read_to_string(&events_path).unwrap()).unwrap();

    let tokenizer = CharTokenizer::from_config(&config);
    let generator = Arc::new(RecordingGenerator::replying(&tokenizer, "ok"));
    let action = FallbackAction::new(build_talker(&config, generator.clone()))
        .with_extractor(HistoryExtractor::new(config.fallback.action_name.clone()));

    // Only the latest user turn is linked when `action_talk` is not the fallback.
    let outcome = action.run(&log).await.unwrap();
    assert_eq!(outcome.message.as_deref(), Some("ok"));
    let windows = generator.windows.lock().unwrap();
    assert_eq!(tokenizer.decode(windows[0].ids()).unwrap(), "cool");
}

#[test]
fn context_command_view_of_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let (config_path, events_path) = write_fixtures(&dir);

    let config = AppConfig::load_from(&config_path).unwrap();
    let log = EventLog::from_json(&std::fs::read_to_string(&events_path).unwrap()).unwrap();

    let extractor = HistoryExtractor::new(config.fallback.action_name.clone());
    let (start, history) = extractor.extract_window(log.events()).unwrap();
    assert_eq!(start, 3);

    let conversation = assemble(&history).unwrap();
    assert_eq!(conversation.len(), 3);
    assert_eq!(conversation.pending_query().map(|t| t.text.as_str()), Some("cool"));

    let json = serde_json::to_value(&conversation).unwrap();
    assert_eq!(json["turns"][0]["role"], "user");
    assert_eq!(json["turns"][0]["finalized"], true);
    assert_eq!(json["turns"][2]["finalized"], false);
}

#[test]
fn default_config_round_trips_through_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, AppConfig::default_toml()).unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    assert_eq!(config.model.name, AppConfig::default().model.name);
    assert_eq!(config.context.max_context_length, 128);
    assert_eq!(config.context.separator, "    ");
    assert_eq!(config.fallback.action_name, "action_default_fallback");
    assert_eq!(config.generation, GenerationParams::default());
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[context]\nmax_context_length = 0\n").unwrap();

    assert!(AppConfig::load_from(&path).is_err());
}
