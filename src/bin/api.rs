use honeypot_agent::{
    api::start_server,
    callback::{CallbackDispatcher, HttpIntakeSink},
    config::Config,
    engine::HoneypotEngine,
    responder::PersonaResponder,
    session::InMemorySessionStore,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    info!("Scam Honeypot Agent - API Server");
    info!("Port: {}", config.port);
    info!(
        "Callback: {} (threshold {} turns, {} workers)",
        config.intake_url, config.callback_turn_threshold, config.callback_workers
    );

    // Create components
    let sink = Arc::new(HttpIntakeSink::new(
        config.intake_url.clone(),
        config.callback_timeout,
    ));
    let dispatcher = CallbackDispatcher::start(
        sink,
        config.callback_workers,
        config.callback_queue_depth,
        config.max_reported_keywords,
    );
    let store = Box::new(InMemorySessionStore::new());
    let responder = PersonaResponder::new();

    let engine = Arc::new(HoneypotEngine::new(
        store,
        responder,
        dispatcher,
        config.callback_turn_threshold,
    ));

    // Optional idle-session eviction
    if let Some(ttl) = config.session_ttl {
        let engine = Arc::clone(&engine);
        let sweep_every = ttl.min(std::time::Duration::from_secs(60));
        info!("Session TTL enabled: {:?}", ttl);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_every);
            loop {
                interval.tick().await;
                engine.prune_idle(ttl).await;
            }
        });
    }

    info!("Engine initialized, starting API server...");

    start_server(engine, config.api_key.clone(), config.port).await?;

    Ok(())
}
