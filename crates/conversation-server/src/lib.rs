pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;
pub mod storage;

pub use config::{CompletionParams, ConfigError, GenerationConfig, ModelPreset, ServerConfig};
pub use error::AppError;
pub use server::{app_config, run_server_with_config};
pub use state::AppState;
pub use storage::{ConversationStorage, JsonStorage};
