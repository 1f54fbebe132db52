//! The `config-check` command — validate configuration and report which
//! credentials are available.

use veritas_config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;

    println!("Configuration OK\n");
    println!("Generator");
    println!("  model:              {}", config.generator.model);
    println!("  temperature:        {}", config.generator.temperature);
    println!(
        "  anthropic key:      {}",
        present(config.generator.anthropic_api_key.is_some())
    );
    println!(
        "  openai key:         {}",
        present(config.generator.openai_api_key.is_some())
    );

    println!("\nTools");
    println!("  cache ttl:          {}s", config.tools.cache_ttl_secs);
    println!("  cache capacity:     {}", config.tools.cache_capacity);
    println!(
        "  brave key:          {}",
        present(config.tools.brave_api_key.is_some())
    );
    println!(
        "  google pse key/cx:  {}",
        present(config.tools.google_pse_api_key.is_some() && config.tools.google_pse_cx.is_some())
    );

    println!("\nDebate defaults");
    println!("  max rounds:         {}", config.debate.max_rounds);
    println!("  max searches:       {}", config.debate.max_searches);
    println!("  language:           {}", config.debate.language);
    println!("  pro personality:    {:?}", config.debate.pro_personality);
    println!("  contra personality: {:?}", config.debate.contra_personality);
    println!("  lazy opening:       {}", config.debate.lazy_opening);

    if config.generator.anthropic_api_key.is_none() && config.generator.openai_api_key.is_none() {
        println!("\nWarning: no generator API key configured; `verify` will fail at startup.");
    }

    Ok(())
}

fn present(yes: bool) -> &'static str {
    if yes { "configured" } else { "missing" }
}
