//! Well-known model aliases.
//!
//! Friendly names that resolve to Hugging Face Hub repos holding a GGUF
//! file and the matching `tokenizer.json`.

/// Where to fetch a preset's weights and tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelPreset {
    pub repo: &'static str,
    pub gguf_file: &'static str,
    pub tokenizer_repo: &'static str,
}

/// Aliases accepted by [`resolve_preset`], for help and error messages.
pub const PRESET_NAMES: &[&str] = &[
    "tinyllama",
    "smollm:135m",
    "smollm:360m",
    "smollm:1.7b",
    "qwen:0.5b",
    "qwen:1.5b",
];

pub fn resolve_preset(alias: &str) -> Option<ModelPreset> {
    let alias_lower = alias.to_lowercase();
    match alias_lower.as_str() {
        "tinyllama" | "tiny-llama" | "tinyllama-1.1b" => Some(ModelPreset {
            repo: "TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF",
            gguf_file: "tinyllama-1.1b-chat-v1.0.Q4_K_M.gguf",
            tokenizer_repo: "TinyLlama/TinyLlama-1.1B-Chat-v1.0",
        }),
        "smollm" | "smollm:135m" | "smollm-135m" => Some(ModelPreset {
            repo: "TheBloke/SmolLM-135M-Instruct-GGUF",
            gguf_file: "smollm-135m-instruct.Q4_K_M.gguf",
            tokenizer_repo: "HuggingFaceTB/SmolLM-135M-Instruct",
        }),
        "smollm:360m" | "smollm-360m" => Some(ModelPreset {
            repo: "TheBloke/SmolLM-360M-Instruct-GGUF",
            gguf_file: "smollm-360m-instruct.Q4_K_M.gguf",
            tokenizer_repo: "HuggingFaceTB/SmolLM-360M-Instruct",
        }),
        "smollm:1.7b" | "smollm-1.7b" => Some(ModelPreset {
            repo: "TheBloke/SmolLM-1.7B-Instruct-GGUF",
            gguf_file: "smollm-1.7b-instruct.Q4_K_M.gguf",
            tokenizer_repo: "HuggingFaceTB/SmolLM-1.7B-Instruct",
        }),
        "qwen:0.5b" | "qwen-0.5b" | "qwen2-0.5b" => Some(ModelPreset {
            repo: "Qwen/Qwen2-0.5B-Instruct-GGUF",
            gguf_file: "qwen2-0_5b-instruct-q4_k_m.gguf",
            tokenizer_repo: "Qwen/Qwen2-0.5B-Instruct",
        }),
        "qwen:1.5b" | "qwen-1.5b" | "qwen2-1.5b" => Some(ModelPreset {
            repo: "Qwen/Qwen2-1.5B-Instruct-GGUF",
            gguf_file: "qwen2-1_5b-instruct-q4_k_m.gguf",
            tokenizer_repo: "Qwen/Qwen2-1.5B-Instruct",
        }),
        _ => None,
    }
}

/// Whether `name` points at a local GGUF file rather than a preset.
pub fn is_gguf_path(name: &str) -> bool {
    name.ends_with(".gguf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_preset_aliases() {
        assert!(resolve_preset("tinyllama").is_some());
        assert!(resolve_preset("TinyLlama").is_some());
        assert!(resolve_preset("smollm:135m").is_some());
        assert!(resolve_preset("qwen:0.5b").is_some());
        assert!(resolve_preset("nonexistent").is_none());
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in PRESET_NAMES {
            assert!(resolve_preset(name).is_some(), "{name} should resolve");
        }
    }

    #[test]
    fn gguf_paths_are_not_presets() {
        assert!(is_gguf_path("/models/blenderbot.gguf"));
        assert!(!is_gguf_path("smollm:135m"));
    }
}
