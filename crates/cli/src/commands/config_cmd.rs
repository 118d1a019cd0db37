//! `creditpack config` — Configuration management commands.

use creditpack_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");
            println!();
            println!("   Analyst agent:     {}", config.router.analyst_agent);
            println!("   Compliance agent:  {}", config.router.compliance_agent);
            match config.router.query_timeout_ms {
                0 => println!("   Query timeout:     none"),
                ms => println!("   Query timeout:     {ms}ms"),
            }
            println!("   Topic rules:       {}", config.router.topics.len());
            println!(
                "   Search results:    {} (max {})",
                config.tools.default_num_results, config.tools.max_num_results
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

pub async fn print_default() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::default_toml());
    Ok(())
}
