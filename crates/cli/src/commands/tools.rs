//! `creditpack tools` — list and verify tool declarations.

use creditpack_config::AppConfig;
use creditpack_core::tool::ToolRegistry;

pub async fn run(json: bool, check: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = creditpack_tools::registry_with_limits(&config.tools);

    if json {
        println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
    } else {
        print_listing(&registry);
    }

    if check {
        let violations = registry.verify_declarations();
        if !violations.is_empty() {
            for v in &violations {
                eprintln!("  ❌ {v}");
            }
            return Err(format!("{} tool declaration problem(s)", violations.len()).into());
        }
        eprintln!("  ✅ Declarations, bindings and aliases agree");
    }

    Ok(())
}

fn print_listing(registry: &ToolRegistry) {
    println!("{}", registry.prompt_listing());
    let aliases = registry.aliases();
    if !aliases.is_empty() {
        println!();
        for (alias, canonical) in aliases {
            println!("  {alias} → {canonical}");
        }
    }
}
