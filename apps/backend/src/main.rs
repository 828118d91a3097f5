use beanpot::config::EngineConfig;
use beanpot::infra::state::build_state;
use tracing::{info, warn};

mod telemetry;

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    // Timings, AI provider and arena settings come from BEANPOT_* variables.
    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid engine configuration: {e}");
            std::process::exit(1);
        }
    };
    let arena_enabled = config.arena_enabled;

    let app_state = match build_state().with_config(config).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let arena = arena_enabled.then(|| app_state.spawn_arena());
    info!(arena = arena_enabled, "Match engine running");

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }

    info!("Shutting down");
    app_state.shutdown();
    if let Some(handle) = arena {
        if let Err(e) = handle.await {
            warn!(error = %e, "Arena loop ended abnormally");
        }
    }
}
