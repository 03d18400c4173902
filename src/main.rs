use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use buildforge::catalog::{Catalog, CatalogLoader, CLASSES};
use buildforge::cli::{Cli, Commands, ConfigAction};
use buildforge::config::{expand_path, Config};
use buildforge::context::{BuildRequest, ContextBuilder};
use buildforge::error::{BuildForgeError, Result};
use buildforge::filtering::RelevanceFilter;
use buildforge::patterns::{PatternRegistry, BUILTIN_RULES};
use buildforge::tags::{TagCategory, TagExtractor};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Handle commands
    match cli.command {
        Commands::Tags { description, json } => {
            cmd_tags(cli.config, &description, json)?;
        }
        Commands::Recommend {
            description,
            class,
            ascendancy,
            json,
        } => {
            let request = BuildRequest {
                description,
                class,
                ascendancy,
            };
            cmd_recommend(cli.config, &request, json)?;
        }
        Commands::Supports { skill, limit, json } => {
            cmd_supports(cli.config, &skill, limit, json)?;
        }
        Commands::Slot {
            slot,
            description,
            limit,
            json,
        } => {
            cmd_slot(cli.config, &slot, description.as_deref(), limit, json)?;
        }
        Commands::Classes => {
            cmd_classes();
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "buildforge=debug" } else { "buildforge=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_tags(config_path: Option<PathBuf>, description: &str, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let extractor = TagExtractor::new(load_patterns(&config)?);
    let tags = extractor.extract(description);

    if json {
        return print_json(&tags);
    }

    for category in TagCategory::ALL {
        let values = tags.get(category);
        if !values.is_empty() {
            println!("{:<14} {}", category.as_str(), values.join(", "));
        }
    }
    let all = tags.all_tags();
    if all.is_empty() {
        println!("No tags detected");
    } else {
        println!("\nMatched tags: {}", all.join(", "));
    }

    Ok(())
}

fn cmd_recommend(config_path: Option<PathBuf>, request: &BuildRequest, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let patterns = load_patterns(&config)?;
    let catalog = load_catalog(&config, patterns.clone())?;
    let extractor = TagExtractor::new(patterns);

    let builder = ContextBuilder::new(&extractor, RelevanceFilter::new(&catalog), &config.limits);
    let context = builder.build(request)?;

    if json {
        return print_json(&context);
    }

    println!(
        "Matched tags: {}",
        if context.matched_tags.is_empty() {
            "none detected".to_string()
        } else {
            context.matched_tags.join(", ")
        }
    );
    if let Some(class) = context.class {
        println!("Class: {} ({}) - {}", class.name, class.attribute, class.mechanic);
    }

    println!("\nActive skills ({}):", context.active_skills.len());
    for skill in &context.active_skills {
        println!("  - {} ({}): {}", skill.name, skill.skill_type, skill.tag_string);
    }

    println!("\nSupport gems ({}):", context.support_gems.len());
    for gem in &context.support_gems {
        println!("  - {}: {}", gem.name, gem.tag_string);
    }

    println!("\nUnique items ({}):", context.unique_items.len());
    for item in &context.unique_items {
        let key_mods: Vec<&str> = item.explicits.iter().take(2).map(String::as_str).collect();
        println!("  - {} ({}): {}", item.name, item.base_type, key_mods.join("; "));
    }

    let keystones: Vec<&str> = context.keystones().map(|n| n.name.as_str()).collect();
    println!("\nPassives ({}):", context.passives.len());
    println!(
        "  Keystones: {}",
        if keystones.is_empty() { "None".to_string() } else { keystones.join(", ") }
    );
    for node in context.notables() {
        println!("  - {}: {}", node.name, first_or_empty(&node.stats));
    }

    if !context.runes.is_empty() {
        println!("\nRunes ({}):", context.runes.len());
        for rune in &context.runes {
            let slots: Vec<&str> = rune.slots.keys().map(String::as_str).collect();
            let first_stat = rune.all_stats().next().unwrap_or("");
            println!("  - {} ({}): {}", rune.name, slots.join("/"), first_stat);
        }
    }

    for choice in &context.ascendancies {
        println!("\n{} ({} nodes):", choice.name, choice.nodes.len());
        for node in &choice.nodes {
            println!("  - {}: {}", node.name, first_or_empty(&node.stats));
        }
    }

    Ok(())
}

fn cmd_supports(
    config_path: Option<PathBuf>,
    skill_name: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(&config, load_patterns(&config)?)?;

    let skill = catalog
        .skill_by_id(skill_name)
        .or_else(|| catalog.skill_by_name(skill_name))
        .ok_or_else(|| BuildForgeError::InvalidRequest(format!("Unknown skill: {}", skill_name)))?;

    let limit = limit.unwrap_or(config.limits.support_gems);
    let gems = RelevanceFilter::new(&catalog).support_gems(skill, limit);

    if json {
        return print_json(&gems);
    }

    println!("Support gems for {} ({}):", skill.name, gems.len());
    for gem in &gems {
        println!("  - {}: {}", gem.name, gem.tag_string);
    }
    Ok(())
}

fn cmd_slot(
    config_path: Option<PathBuf>,
    slot: &str,
    description: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let patterns = load_patterns(&config)?;
    let catalog = load_catalog(&config, patterns.clone())?;

    let tags = description.map(|d| TagExtractor::new(patterns).extract(d));
    let limit = limit.unwrap_or(config.limits.slot_items);
    let slot = slot.trim().to_lowercase();
    let items = RelevanceFilter::new(&catalog).items_by_slot(&slot, tags.as_ref(), limit);

    if json {
        return print_json(&items);
    }

    println!("Unique {} items ({}):", slot, items.len());
    for item in &items {
        println!("  - {} ({})", item.name, item.base_type);
    }
    Ok(())
}

fn cmd_classes() {
    for class in CLASSES {
        println!("{} [{}] - {}", class.name, class.attribute, class.mechanic);
        println!("  {}", class.description);
        println!("  Ascendancies: {}", class.ascendancies.join(", "));
    }
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            let text = toml::to_string_pretty(&config)?;
            println!("{}", text);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);

            if let Some(rules) = &config.patterns.rules_file {
                let registry = PatternRegistry::from_config_file(&expand_path(rules)?)?;
                println!("✓ Tag rules are valid ({} build rules)", registry.build.len());
            }
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            // Create parent directory
            let config_dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&config_dir).map_err(|e| BuildForgeError::Io {
                source: e,
                context: format!("Failed to create config directory: {:?}", config_dir),
            })?;

            let mut config = Config::default();
            let rules_path = config_dir.join("tag_rules.toml");
            if force || !rules_path.exists() {
                std::fs::write(&rules_path, BUILTIN_RULES).map_err(|e| BuildForgeError::Io {
                    source: e,
                    context: format!("Failed to write tag rules: {:?}", rules_path),
                })?;
            }
            config.patterns.rules_file = Some(rules_path.clone());
            config.save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
            println!("✓ Tag rules installed at: {}", rules_path.display());
        }
        ConfigAction::Path => {
            println!("{}", Config::default_path()?.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    Config::load_or_default(&path)
}

fn load_patterns(config: &Config) -> Result<Arc<PatternRegistry>> {
    let rules_file = match &config.patterns.rules_file {
        Some(path) => Some(expand_path(path)?),
        None => None,
    };
    Ok(Arc::new(PatternRegistry::from_optional_file(
        rules_file.as_deref(),
    )?))
}

fn load_catalog(config: &Config, patterns: Arc<PatternRegistry>) -> Result<Catalog> {
    CatalogLoader::new(patterns).load(&config.catalog.resolved()?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| BuildForgeError::Json {
        source: e,
        context: "Failed to serialize output".to_string(),
    })?;
    println!("{}", json);
    Ok(())
}

fn first_or_empty(lines: &[String]) -> &str {
    lines.first().map(String::as_str).unwrap_or("")
}
