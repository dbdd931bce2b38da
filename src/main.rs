mod config;
mod controller;
mod enrich;
mod log;
mod model;
mod store;
mod tui;

use dotenv::dotenv;
use std::env;
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

use config::Config;
use controller::TaskController;
use enrich::GeminiEnricher;
use store::SupabaseStore;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let env_filter = EnvFilter::try_from_env("TASKPAD_LOG");
    log::setup(env_filter);

    event!(Level::INFO, "Starting Taskpad: {}", env!("FULL_VERSION"));

    let config_path = env::var("TASKPAD_CONFIG").unwrap_or_else(|_| "taskpad.yaml".to_string());
    let config = Config::from_file(&config_path)?;

    let store = SupabaseStore::new(&config.supabase)?;
    let enricher = GeminiEnricher::new(&config.gemini)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let handle = TaskController::start(store, enricher);
        tui::run(handle).await
    })
}

#[cfg(all(test, feature = "e2e"))]
mod e2e_tests;
