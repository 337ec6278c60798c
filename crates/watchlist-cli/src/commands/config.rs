use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use serde_json::json;
use watchlist_config::{Config, PathManager};
use crate::output::Output;

pub fn run_config(cmd: crate::ConfigCommands, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(paths, full, output),
        crate::ConfigCommands::Init { api_key, force } => init_config(paths, api_key, force, output),
        crate::ConfigCommands::Path => show_paths(paths, output),
    }
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Create one with 'watchlist config init --api-key <KEY>'.");
    }

    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let api_key = if full {
        config.tmdb.api_key.clone()
    } else {
        mask_string(&config.tmdb.api_key)
    };
    let database = config.database_path(paths.database_file());

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file,
            "tmdb": {
                "api_key": api_key,
                "base_url": config.tmdb.base_url,
                "image_base_url": config.tmdb.image_base_url,
                "language": config.tmdb.language,
            },
            "storage": { "database_path": database },
            "messages": config.messages,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
    table.add_row(vec![Cell::new("TMDB API key"), Cell::new(api_key)]);
    table.add_row(vec![Cell::new("TMDB base URL"), Cell::new(&config.tmdb.base_url)]);
    table.add_row(vec![Cell::new("Image base URL"), Cell::new(&config.tmdb.image_base_url)]);
    table.add_row(vec![
        Cell::new("Language"),
        Cell::new(config.tmdb.language.as_deref().unwrap_or("(default)")),
    ]);
    table.add_row(vec![Cell::new("Database"), Cell::new(database.display())]);
    println!("{}", table);

    if let Err(e) = config.validate() {
        output.warn(e.to_string());
    }

    Ok(())
}

fn init_config(paths: &PathManager, api_key: Option<String>, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        return Err(eyre!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
    }

    paths.ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;

    let config = Config::template().with_api_key_override(api_key);
    config.save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration written to {}", config_file.display()));
    if !config.is_api_key_configured() {
        output.warn("Edit tmdb.api_key before running other commands.");
    }
    Ok(())
}

fn show_paths(paths: &PathManager, output: &Output) -> Result<()> {
    if output.is_human() {
        output.info(format!("Config:   {}", paths.config_file().display()));
        output.info(format!("Database: {}", paths.database_file().display()));
        output.info(format!("Logs:     {}", paths.log_file().display()));
    } else {
        output.json(&json!({
            "config_file": paths.config_file(),
            "database_file": paths.database_file(),
            "log_file": paths.log_file(),
        }));
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
