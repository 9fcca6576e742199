use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use marquee_config::{Config, CredentialStore, OMDB_API_KEY_ENV};
use owo_colors::OwoColorize;
use serde_json::json;

use super::{prompts, Context};
use crate::output::{mask_secret, styled_table, Output};
use crate::ConfigCommands;

pub fn run_config(context: &Context, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(context, full, output),
        ConfigCommands::Init { force } => init_config(context, force, output),
        ConfigCommands::Omdb { api_key, clear } => configure_omdb(context, api_key, clear, output),
    }
}

/// Where the effective API key comes from
fn api_key_source(config: &Config, credentials: &CredentialStore) -> &'static str {
    config
        .api_key_with_source(std::env::var(OMDB_API_KEY_ENV).ok(), credentials)
        .map(|(_, source)| source.as_str())
        .unwrap_or("not set")
}

fn show_config(context: &Context, full: bool, output: &Output) -> Result<()> {
    let config = &context.config;
    let credentials = &context.credentials;
    let api_key = config.resolve_api_key(credentials).unwrap_or_default();
    let api_key_display = if full { api_key.clone() } else { mask_secret(&api_key) };
    let database_url = config.database_url(&context.paths);
    let config_file = context.paths.config_file();
    let key_updated = credentials
        .get_omdb_api_key_updated()
        .map(|updated| updated.to_rfc3339());

    if !output.is_human() {
        output.data(&json!({
            "config_file": config_file,
            "omdb": {
                "api_key": api_key_display,
                "api_key_source": api_key_source(config, credentials),
                "api_key_updated": key_updated,
                "base_url": config.omdb.base_url,
                "timeout_secs": config.omdb.timeout_secs,
            },
            "server": { "host": config.server.host, "port": config.server.port },
            "database": { "url": database_url, "max_connections": config.database.max_connections },
            "import": {
                "default_language_id": config.import.default_language_id,
                "default_category_id": config.import.default_category_id,
            },
            "logging": { "level": config.logging.level, "json": config.logging.json, "file": config.logging.file },
        }));
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!(
            "No config file at {}; showing defaults. Run 'marquee config init' to create one.",
            config_file.display()
        ));
    }

    let mut table = styled_table(&["Setting", "Value"]);
    let rows: Vec<(&str, String)> = vec![
        ("Config file", config_file.display().to_string()),
        ("OMDB API key", api_key_display),
        ("  source", api_key_source(config, credentials).to_string()),
        ("  stored at", key_updated.unwrap_or_else(|| "-".to_string())),
        ("OMDB base URL", config.omdb.base_url.clone()),
        ("OMDB timeout", format!("{}s", config.omdb.timeout_secs)),
        ("Server", config.bind_address()),
        ("Data directory", context.paths.data_dir().display().to_string()),
        ("Database", database_url),
        ("Max connections", config.database.max_connections.to_string()),
        ("Default language", config.import.default_language_id.to_string()),
        (
            "Default category",
            config
                .import
                .default_category_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "<none>".to_string()),
        ),
        ("Log level", config.logging.level.clone()),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    output.table(&table);

    if !config.is_omdb_configured(credentials) {
        output.warn(format!(
            "OMDB is not configured. Run '{}' or set {}",
            "marquee config omdb".cyan(),
            OMDB_API_KEY_ENV
        ));
    }
    Ok(())
}

fn init_config(context: &Context, force: bool, output: &Output) -> Result<()> {
    let config_file = context.paths.config_file();
    if config_file.exists() && !force {
        return Err(eyre!(
            "{} already exists; pass --force to overwrite it",
            config_file.display()
        ));
    }

    context
        .paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;

    output.success(format!("Wrote default config to {}", config_file.display()));
    output.info(format!("Next: store your OMDB API key with '{}'", "marquee config omdb".cyan()));
    Ok(())
}

fn configure_omdb(context: &Context, api_key: Option<String>, clear: bool, output: &Output) -> Result<()> {
    let mut credentials = CredentialStore::new(context.paths.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

    if clear {
        credentials.clear_omdb_api_key();
        credentials
            .save()
            .map_err(|e| eyre!("Failed to save credentials: {}", e))?;
        output.success("Removed the stored OMDB API key");
        return Ok(());
    }

    let api_key = match api_key {
        Some(key) => key.trim().to_string(),
        None => {
            output.info("Get a free key at https://www.omdbapi.com/apikey.aspx");
            prompts::prompt_secret("OMDB API key")?
        }
    };
    if api_key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    credentials.set_omdb_api_key(api_key.clone());
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success(format!(
        "Stored OMDB API key {} in {}",
        mask_secret(&api_key),
        context.paths.credentials_file().display()
    ));
    if std::env::var(OMDB_API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the stored key", OMDB_API_KEY_ENV));
    }
    Ok(())
}
