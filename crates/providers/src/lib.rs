//! Tokenizer and model backends for talker.
//!
//! All backends implement the `talker_core` collaborator traits
//! ([`Tokenizer`](talker_core::Tokenizer) and [`Generator`](talker_core::Generator)).
//! The Candle-based local backend lives behind the `local` feature.

#[cfg(feature = "local")]
pub mod hf_tokenizer;
#[cfg(feature = "local")]
pub mod local;
pub mod presets;
pub mod sampling;

#[cfg(feature = "local")]
pub use hf_tokenizer::HfTokenizer;
#[cfg(feature = "local")]
pub use local::LocalGenerator;
pub use presets::{ModelPreset, PRESET_NAMES, resolve_preset};

/// Build the tokenizer and generator described by the configuration.
///
/// Blocking: the tokenizer may be downloaded from the Hugging Face Hub.
/// The generator loads its weights lazily on the first request.
#[cfg(feature = "local")]
pub fn build_from_config(
    config: &talker_config::AppConfig,
) -> Result<
    (
        std::sync::Arc<dyn talker_core::Tokenizer>,
        std::sync::Arc<dyn talker_core::Generator>,
    ),
    talker_core::ProviderError,
> {
    use std::path::Path;
    use std::sync::Arc;
    use talker_core::ProviderError;

    if config.model.device != "cpu" {
        tracing::warn!(
            device = %config.model.device,
            "Only CPU inference is supported, falling back to cpu"
        );
    }

    let context = &config.context;
    let tokenizer = if let Some(path) = &config.model.tokenizer_path {
        HfTokenizer::from_file(
            path,
            &context.separator,
            context.boundary_marker,
            context.max_context_length,
        )?
    } else if presets::is_gguf_path(&config.model.name) {
        let path = Path::new(&config.model.name).with_file_name("tokenizer.json");
        if !path.exists() {
            return Err(ProviderError::NotConfigured(format!(
                "No tokenizer.json next to '{}'; set model.tokenizer_path",
                config.model.name
            )));
        }
        HfTokenizer::from_file(
            &path,
            &context.separator,
            context.boundary_marker,
            context.max_context_length,
        )?
    } else {
        let preset = resolve_preset(&config.model.name).ok_or_else(|| {
            ProviderError::ModelNotFound(format!(
                "Unknown local model '{}'. Available presets: {}",
                config.model.name,
                PRESET_NAMES.join(", ")
            ))
        })?;
        HfTokenizer::from_hub(
            preset.tokenizer_repo,
            &context.separator,
            context.boundary_marker,
            context.max_context_length,
        )?
    };

    let generator = LocalGenerator::new(&config.model.name);
    Ok((Arc::new(tokenizer), Arc::new(generator)))
}
