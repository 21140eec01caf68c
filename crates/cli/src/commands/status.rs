//! `gigmate status` — Show configuration status.

use gigmate_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Gigmate Status");
    println!("==============");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Backend:       {}", config.backend.base_url);
    println!(
        "  Backend auth:  {}",
        if config.backend.api_token.is_some() {
            "token set"
        } else {
            "no token (public endpoints only)"
        }
    );
    println!(
        "  Mock mode:     {}",
        if config.backend.mock { "on" } else { "off" }
    );
    println!("  Model:         {}", config.model.model);
    println!(
        "  Model key:     {}",
        if config.model.api_key.is_some() {
            "set"
        } else {
            "missing"
        }
    );
    println!("  History limit: {} turns", config.session.max_history_length);
    println!(
        "  Cache:         {} entries, {}s TTL",
        config.cache.capacity, config.cache.ttl_secs
    );
    println!("  Context TTL:   {}s", config.context.staleness_secs);
    println!(
        "  Retry:         {} attempts, {}ms base delay",
        config.retry.max_attempts, config.retry.base_delay_ms
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `gigmate init` first");
    }

    Ok(())
}
