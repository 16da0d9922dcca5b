//! Ollama bridge - OpenAI-compatible chat completions for a local Ollama.

use std::env;
use std::sync::Arc;

use ollama_bridge::{logging, AppState, Config, GatewayService, OllamaEngine};
use tokio::net::TcpListener;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("ollama-bridge {}", VERSION);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }

    // Load configuration; refuse to start without a bearer token
    let config = Config::load().map_err(|e| format!("Failed to load configuration: {}", e))?;

    logging::init_tracing(&config.logging.level);
    tracing::info!("Starting ollama-bridge {}", VERSION);

    let engine = Arc::new(OllamaEngine::from_config(&config.ollama)?);
    tracing::info!("Using Ollama engine at {}", engine.base_url());

    let service = Arc::new(GatewayService::new(engine));

    // Initial cache population
    let models = service
        .refresh_inventory()
        .await
        .map_err(|e| format!("Failed to list models from Ollama: {}", e))?;
    tracing::info!("Initial available models: {:?}", models);

    let state = Arc::new(AppState::new(&config, service));
    let app = ollama_bridge::app(state);

    // Start server
    let addr = config.bind_addr();
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
