//! Cache maintenance commands

use std::sync::Arc;

use crate::config::{AppConfig, CacheSettings};
use crate::domain::cache::{Cache, CacheExt, CachedValue};
use crate::infrastructure::cache::CacheFactory;
use crate::infrastructure::logging;
use crate::infrastructure::orchestrator::{CacheOrchestrator, InvalidationTarget};
use crate::infrastructure::registry::CacheRegistry;

use super::Command;

/// Loads configuration, builds the tiers and runs `command`
pub async fn run(command: Command) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging)?;
    ensure_shared_remote(&config.cache)?;

    let cache = CacheFactory::new()
        .create(&config.cache.to_cache_config())
        .await?;

    let orchestrator = CacheOrchestrator::new(Arc::new(CacheRegistry::new()))
        .with_key_builder(config.cache.key_builder());
    orchestrator.bind_cache(Arc::new(cache)).await;

    let output = execute(&orchestrator, command).await?;
    println!("{}", output);

    Ok(())
}

/// A process-local last tier starts empty on every run, so commands against it
/// could only ever report misses
pub fn ensure_shared_remote(settings: &CacheSettings) -> anyhow::Result<()> {
    if !settings.remote.is_shared() {
        anyhow::bail!(
            "Remote tier is '{}', which lives only inside this process; \
             set APP__CACHE__REMOTE=redis and APP__CACHE__REDIS_URL to inspect a shared cache",
            settings.remote
        );
    }

    Ok(())
}

/// Runs a command against the orchestrator's bound cache and renders the result
pub async fn execute(orchestrator: &CacheOrchestrator, command: Command) -> anyhow::Result<String> {
    let cache = orchestrator.binding().current().await?;

    let output = match command {
        Command::Get { key } => match cache.get::<CachedValue>(&key).await? {
            Some(CachedValue::Present(value)) => serde_json::to_string_pretty(&value)?,
            Some(CachedValue::Empty) => "(empty)".to_string(),
            None => "(miss)".to_string(),
        },
        Command::Ttl { key } => match cache.ttl(&key).await? {
            Some(ttl) => ttl.as_secs().to_string(),
            None if cache.exists(&key).await? => "(no expiry)".to_string(),
            None => "(miss)".to_string(),
        },
        Command::Delete { key } => {
            let deleted = orchestrator.invalidate(InvalidationTarget::Key(key)).await?;
            let label = if deleted { "deleted" } else { "(miss)" };
            label.to_string()
        }
        Command::Reset => {
            orchestrator.reset_all().await?;
            "reset".to_string()
        }
    };

    Ok(output)
}
