//! `talker config`: Configuration inspection.

use talker_config::AppConfig;
use talker_providers::presets::{is_gguf_path, resolve_preset};

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!();
    if config_path.exists() {
        println!("  Config:    {}", config_path.display());
    } else {
        println!("  Config:    {} (not found, defaults)", config_path.display());
    }
    for (label, value) in resolved(&config) {
        println!("  {:<10} {value}", format!("{label}:"));
    }
    println!();

    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub async fn defaults() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::default_toml());
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_dir().join("config.toml").display());
    Ok(())
}

/// Where each collaborator will come from under this configuration.
fn resolved(config: &AppConfig) -> Vec<(&'static str, String)> {
    let name = &config.model.name;
    let preset = resolve_preset(name);

    let model = if is_gguf_path(name) {
        format!("{name} (GGUF file)")
    } else if let Some(preset) = preset {
        format!("{name} ({}/{})", preset.repo, preset.gguf_file)
    } else {
        format!("{name} (unknown preset)")
    };

    let tokenizer = match (&config.model.tokenizer_path, preset) {
        (Some(path), _) => path.display().to_string(),
        (None, _) if is_gguf_path(name) => "tokenizer.json beside the GGUF file".to_string(),
        (None, Some(preset)) => format!("{} (Hugging Face Hub)", preset.tokenizer_repo),
        (None, None) => "unresolved".to_string(),
    };

    let marker = match config.context.boundary_marker {
        Some(id) => format!("id {id} (configured)"),
        None => format!("encoding of separator {:?}", config.context.separator),
    };

    let backend = if cfg!(feature = "local") {
        "local (candle)".to_string()
    } else {
        "none (rebuild with --features local)".to_string()
    };

    vec![
        ("Model", model),
        ("Tokenizer", tokenizer),
        ("Marker", marker),
        ("Budget", format!("{} tokens", config.context.max_context_length)),
        ("Fallback", config.fallback.action_name.clone()),
        ("Backend", backend),
    ]
}
