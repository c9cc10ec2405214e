//! Server and generation configuration
//!
//! Everything here is an explicit value handed to `AppState`; nothing is
//! read from global state after startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8090;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_MODEL: &str = "gpt35";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown model '{name}', expected one of: {known}")]
    UnknownModel { name: String, known: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub debug: bool,
    pub generation: GenerationConfig,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: default_data_dir(),
            debug: false,
            generation: GenerationConfig::default(),
        }
    }
}

/// `~/.branching-chat/conversations`, falling back to the temp dir
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".branching-chat")
        .join("conversations")
}

/// Sampling parameters shared by every completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    #[serde(default)]
    pub stop: Option<Vec<String>>,
    pub stream: bool,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: None,
            stream: false,
        }
    }
}

/// Model name exposed to clients and the engine it maps to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelPreset {
    pub name: String,
    pub engine: String,
}

impl ModelPreset {
    pub fn new(name: impl Into<String>, engine: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: engine.into(),
        }
    }
}

/// Configuration for the title/answer generation collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    pub default_model: String,
    pub params: CompletionParams,
    pub models: Vec<ModelPreset>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            params: CompletionParams::default(),
            models: vec![
                ModelPreset::new("gpt35", "gpt-35-turbo-0613"),
                ModelPreset::new("gpt35-16k", "gpt-35-turbo-16k"),
                ModelPreset::new("gpt4", "gpt-4-0613"),
                ModelPreset::new("gpt4-32k", "gpt4-32k-0613"),
            ],
        }
    }
}

impl GenerationConfig {
    pub fn model(&self, name: &str) -> Option<&ModelPreset> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Select the default model; it must be one of the presets.
    pub fn with_default_model(mut self, name: &str) -> Result<Self, ConfigError> {
        if self.model(name).is_none() {
            let known: Vec<&str> = self.models.iter().map(|m| m.name.as_str()).collect();
            return Err(ConfigError::UnknownModel {
                name: name.to_string(),
                known: known.join(", "),
            });
        }
        self.default_model = name.to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.default_model, "gpt35");
        assert_eq!(config.model("gpt4").unwrap().engine, "gpt-4-0613");
        assert_eq!(config.params.temperature, 0.7);
        assert!(!config.params.stream);
    }

    #[test]
    fn test_unknown_default_model_is_rejected() {
        let err = GenerationConfig::default()
            .with_default_model("gpt5")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownModel {
                name: "gpt5".to_string(),
                known: "gpt35, gpt35-16k, gpt4, gpt4-32k".to_string(),
            }
        );
        assert!(err.to_string().contains("'gpt5'"));

        let config = GenerationConfig::default()
            .with_default_model("gpt4-32k")
            .unwrap();
        assert_eq!(config.default_model, "gpt4-32k");
    }

    #[test]
    fn test_bind_address() {
        let config = ServerConfig {
            port: 9000,
            ..ServerConfig::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }
}
