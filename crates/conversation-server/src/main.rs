use clap::Parser;
use std::io;
use std::path::PathBuf;

use conversation_server::config::{default_data_dir, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_PORT};
use conversation_server::logging::init_logging;
use conversation_server::{run_server_with_config, GenerationConfig, ServerConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "conversation-server")]
#[command(about = "Branching conversation HTTP server")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Directory holding one JSON file per conversation
    #[arg(long, env = "CONVERSATION_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Default model preset for generation
    #[arg(long, env = "DEFAULT_MODEL", default_value = DEFAULT_MODEL)]
    default_model: String,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if cli.log_level.is_some() {
        env_logger::init();
    } else {
        init_logging(cli.debug);
    }

    let generation = GenerationConfig::default()
        .with_default_model(&cli.default_model)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        data_dir: cli.data_dir.unwrap_or_else(default_data_dir),
        debug: cli.debug,
        generation,
    };

    log::info!("Starting conversation server on {}", config.bind_address());
    if config.debug {
        log::debug!("Debug mode enabled");
        log::debug!("Server configuration: {:?}", config);
    }

    run_server_with_config(config).await
}
