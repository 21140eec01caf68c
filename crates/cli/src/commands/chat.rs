//! `gigmate chat` — Interactive or single-message chat mode.

use gigmate_agent::Agent;
use gigmate_capabilities::default_registry;
use gigmate_config::AppConfig;
use gigmate_core::model::ModelClient;
use gigmate_core::turn::SessionKey;
use gigmate_model::OpenAiModelClient;
use std::sync::Arc;

pub async fn run(message: Option<String>, user: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early and give a clear error
    if config.model.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No model API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GIGMATE_MODEL_API_KEY = 'sk-...'");
        eprintln!("    OPENAI_API_KEY        = 'sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No model API key found. See above for setup instructions.".into());
    }

    let model: Arc<dyn ModelClient> = Arc::new(OpenAiModelClient::from_config(&config.model)?);
    let agent = Agent::new(&config, model, default_registry(), &user);
    let descriptors = agent.initialize_capabilities().await;

    // One conversation per CLI invocation
    let key = SessionKey::new(&user, uuid::Uuid::new_v4().to_string());

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let response = agent.process(&key, &msg).await;
        eprint!("\r              \r");
        println!("{}", response.message);
        if let Some(data) = &response.data {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Gigmate — your marketplace assistant");
    println!("  ------------------------------------");
    println!("  Model:        {}", config.model.model);
    println!("  Backend:      {}", config.backend.base_url);
    println!("  Capabilities: {}", descriptors.len());
    if config.backend.mock {
        println!("  Mode:         mock (fixture data)");
    }
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type '/summary' for session metrics, 'exit' or Ctrl+C to quit.");
    println!();

    use std::io::{BufRead, Write};
    let stdin = std::io::stdin();

    print!("  You > ");
    std::io::stdout().flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }
        if input.eq_ignore_ascii_case("/summary") {
            match agent.session_summary(&key).await {
                Some(session) => {
                    let m = &session.metrics;
                    println!();
                    println!("  Turns:        {}", session.turns.len());
                    println!("  Successful:   {}", m.successful_turns);
                    println!("  Failed:       {}", m.failed_turns);
                    println!("  Requests:     {} ({} failed)", m.total_requests, m.failed_requests);
                    println!("  Avg response: {}ms", m.avg_response_ms());
                    println!();
                }
                None => {
                    println!();
                    println!("  No conversation yet.");
                    println!();
                }
            }
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }

        eprint!("  ...");
        let response = agent.process(&key, input).await;
        eprint!("\r     \r");

        println!();
        for line in response.message.lines() {
            println!("  Gigmate > {line}");
        }
        if let Some(data) = &response.data {
            for line in serde_json::to_string_pretty(data)?.lines() {
                println!("            {line}");
            }
        }
        if !response.suggestions.is_empty() {
            println!();
            println!("  You could try:");
            for suggestion in &response.suggestions {
                println!("    · {suggestion}");
            }
        }
        println!();

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
