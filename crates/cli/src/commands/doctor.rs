//! `tripweaver doctor`: Diagnose configuration health.

use tripweaver_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 TripWeaver Doctor — Configuration Diagnostics");
    println!("===============================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — run `tripweaver onboard` (defaults and env vars still apply)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. Fix the config before planning.");
            return Ok(());
        }
    };

    if config.provider == "ollama" {
        println!("  ✅ Local provider, no API key needed");
    } else {
        match config.require_api_key() {
            Ok(_) => println!("  ✅ API key configured"),
            Err(e) => {
                println!("  ❌ {e}");
                issues += 1;
            }
        }
    }

    println!("  ✅ Provider: {} ({})", config.provider, config.base_url());
    println!(
        "  ✅ Models: {} (supervisor: {})",
        config.model, config.supervisor_model
    );
    println!("  ✅ Turn ceiling: {}", config.max_turns);
    if config.cache.enabled {
        println!("  ✅ Session cache on, TTL {}s", config.cache.ttl_secs);
    } else {
        println!("  ✅ Session cache off");
    }

    let output_dir = config.output_dir();
    if output_dir.is_dir() {
        println!("  ✅ Plans are saved to {}", output_dir.display());
    } else {
        println!(
            "  ⚠️  Output directory {} does not exist yet (created on first save)",
            output_dir.display()
        );
    }

    // Only reachable with a usable provider.
    if issues == 0 {
        match tripweaver_providers::build_from_config(&config) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ Provider reachable"),
                Ok(false) => {
                    println!("  ❌ Provider rejected the health check");
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider unreachable: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ {e}");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
