//! `gigmate init` — Write a starter config file.

use gigmate_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("Gigmate — First-Time Setup");
    println!("==========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("  Config file already exists: {}", config_path.display());
        println!("  Leaving it untouched.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Wrote starter config: {}", config_path.display());
    println!();
    println!("  Next steps:");
    println!("    1. Set GIGMATE_MODEL_API_KEY (or OPENAI_API_KEY) for intent classification");
    println!("    2. Set GIGMATE_API_TOKEN for authenticated marketplace calls");
    println!("    3. Run `gigmate chat` to start a conversation");
    println!();
    println!("  Tip: set GIGMATE_MOCK=1 to try capabilities against canned fixture data.");

    Ok(())
}
