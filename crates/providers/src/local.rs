//! Local generator: runs the dialogue model directly on your hardware.
//!
//! Uses [Candle](https://github.com/huggingface/candle) (Rust-native ML) to run
//! GGUF-quantized language models with no network access after the first
//! download. The model receives the bounded context window as-is; the reply
//! is generated token by token with optional temperature sampling, a minimum
//! length, and n-gram repetition blocking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::quantized::gguf_file;
use candle_core::{Device, Tensor};
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::quantized_llama as qlm;
use hf_hub::api::sync::Api;
use talker_core::error::ProviderError;
use talker_core::generator::{GenerationParams, Generator};
use talker_core::token::{ContextWindow, TokenId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::presets::{PRESET_NAMES, is_gguf_path, resolve_preset};
use crate::sampling::constrain_logits;

/// EOS id used when the GGUF metadata does not name one.
const FALLBACK_EOS_TOKEN_ID: TokenId = 2;

/// A generator running a GGUF-quantized model locally via Candle.
///
/// The model sits behind a Mutex; one generation runs at a time.
pub struct LocalGenerator {
    inner: Arc<Mutex<Option<LocalModelState>>>,
    model_name: String,
}

/// The loaded model state (weights + device + EOS id).
struct LocalModelState {
    model: qlm::ModelWeights,
    device: Device,
    eos_token_id: TokenId,
}

impl LocalGenerator {
    /// Create a new local generator.
    ///
    /// `model_name` can be:
    /// - A preset alias: `"tinyllama"`, `"smollm:135m"`, `"qwen:0.5b"`
    /// - A path to a local GGUF file: `"/path/to/model.gguf"`
    ///
    /// The model is loaded lazily on first request.
    pub fn new(model_name: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            model_name: model_name.to_string(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl LocalModelState {
    /// Load a model by preset alias or GGUF path.
    fn load(model_name: &str) -> Result<Self, ProviderError> {
        let path = resolve_model_path(model_name)?;
        Self::load_from_path(&path)
    }

    fn load_from_path(path: &Path) -> Result<Self, ProviderError> {
        info!(path = %path.display(), "Loading local GGUF model");
        let device = Device::Cpu;

        let mut file = std::fs::File::open(path)
            .map_err(|e| ProviderError::NotConfigured(format!("Failed to open GGUF file: {e}")))?;

        let gguf = gguf_file::Content::read(&mut file)
            .map_err(|e| ProviderError::NotConfigured(format!("Failed to parse GGUF file: {e}")))?;

        let eos_token_id = gguf
            .metadata
            .get("tokenizer.ggml.eos_token_id")
            .and_then(|value| value.to_u32().ok())
            .unwrap_or(FALLBACK_EOS_TOKEN_ID);

        let model = qlm::ModelWeights::from_gguf(gguf, &mut file, &device).map_err(|e| {
            ProviderError::NotConfigured(format!("Failed to load model weights: {e}"))
        })?;

        info!(eos_token_id, "Local model loaded successfully");

        Ok(Self {
            model,
            device,
            eos_token_id,
        })
    }

    /// Run inference over the context window and return the generated ids.
    fn generate(
        &mut self,
        context: &[TokenId],
        params: &GenerationParams,
    ) -> Result<Vec<TokenId>, ProviderError> {
        if context.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            context_tokens = context.len(),
            max_new_tokens = params.max_new_tokens,
            temperature = params.temperature,
            "Starting local generation"
        );

        let temperature = (params.temperature > 0.0).then_some(params.temperature);
        let mut logits_processor = LogitsProcessor::new(params.seed, temperature, None);

        let mut generated: Vec<TokenId> = Vec::new();
        let mut input = Tensor::new(context, &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(map_candle_err)?;
        let mut index_pos = 0;

        for _ in 0..params.max_new_tokens {
            let seq_len = input.dim(1).map_err(map_candle_err)?;
            let logits = self
                .model
                .forward(&input, index_pos)
                .and_then(|l| l.squeeze(0))
                .map_err(map_candle_err)?;
            index_pos += seq_len;

            let mut scores = logits.to_vec1::<f32>().map_err(map_candle_err)?;
            constrain_logits(
                &mut scores,
                &generated,
                self.eos_token_id,
                params.min_length,
                params.no_repeat_ngram_size,
            );
            let scores = Tensor::new(scores.as_slice(), &self.device).map_err(map_candle_err)?;

            let next_token = logits_processor.sample(&scores).map_err(map_candle_err)?;
            if next_token == self.eos_token_id {
                break;
            }
            generated.push(next_token);

            // Prepare input for next iteration (just the new token)
            input = Tensor::new(&[next_token][..], &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(map_candle_err)?;
        }

        debug!(generated_tokens = generated.len(), "Generation complete");
        Ok(generated)
    }
}

/// Resolve a preset alias or GGUF path to a local weights file.
fn resolve_model_path(model_name: &str) -> Result<PathBuf, ProviderError> {
    if is_gguf_path(model_name) {
        let path = PathBuf::from(model_name);
        if !path.exists() {
            return Err(ProviderError::ModelNotFound(format!(
                "GGUF file '{model_name}' does not exist"
            )));
        }
        return Ok(path);
    }

    let preset = resolve_preset(model_name).ok_or_else(|| {
        ProviderError::ModelNotFound(format!(
            "Unknown local model '{}'. Available presets: {}. Or provide a path to a .gguf file.",
            model_name,
            PRESET_NAMES.join(", ")
        ))
    })?;

    info!(
        model = model_name,
        repo = preset.repo,
        file = preset.gguf_file,
        "Downloading/loading local model"
    );

    let api = Api::new().map_err(|e| {
        ProviderError::Network(format!("Failed to initialize HuggingFace Hub API: {e}"))
    })?;

    api.model(preset.repo.to_string())
        .get(preset.gguf_file)
        .map_err(|e| {
            ProviderError::Network(format!(
                "Failed to download model '{}' from '{}': {e}",
                preset.gguf_file, preset.repo
            ))
        })
}

/// Map Candle errors to ProviderError.
fn map_candle_err(e: candle_core::Error) -> ProviderError {
    ProviderError::Inference(format!("Candle inference error: {e}"))
}

#[async_trait]
impl Generator for LocalGenerator {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(
        &self,
        window: &ContextWindow,
        params: &GenerationParams,
    ) -> Result<Vec<TokenId>, ProviderError> {
        // Ensure model is loaded (lazy initialization)
        {
            let mut state = self.inner.lock().await;
            if state.is_none() {
                info!(model = %self.model_name, "Loading local model on first request...");
                let name = self.model_name.clone();
                let loaded = tokio::task::spawn_blocking(move || LocalModelState::load(&name))
                    .await
                    .map_err(|e| {
                        ProviderError::Inference(format!("Model loading task failed: {e}"))
                    })??;
                *state = Some(loaded);
            }
        }

        if params.num_beams > 1 {
            warn!(
                num_beams = params.num_beams,
                "Beam search is not available locally, generating a single beam"
            );
        }

        // Run inference on a blocking thread (Candle is CPU-bound)
        let inner = self.inner.clone();
        let context = window.ids().to_vec();
        let params = params.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = inner.blocking_lock();
            let state = guard
                .as_mut()
                .ok_or_else(|| ProviderError::NotConfigured("Local model is not loaded".into()))?;
            state.generate(&context, &params)
        })
        .await
        .map_err(|e| ProviderError::Inference(format!("Inference task panicked: {e}")))?
    }
}
