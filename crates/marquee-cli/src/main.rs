use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use commands::{catalog, config, serve};
use marquee_models::ContentKind;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Marquee - import movies and series from OMDB into your catalog")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP import API
    #[command(long_about = "Serve the JSON import API (search, details, import, bulk import) over HTTP until interrupted with Ctrl-C.")]
    Serve {
        /// Address to bind (defaults to server.host from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to server.port from config)
        #[arg(long)]
        port: Option<u16>,

        /// Keep the catalog in memory instead of SQLite
        #[arg(long, action = ArgAction::SetTrue)]
        memory: bool,

        /// Write logs to a file (rotated daily) instead of stderr; without PATH, logs/marquee.log
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        log_file: Option<Option<PathBuf>>,
    },
    /// Search OMDB by title
    Search {
        /// Title to look for (at least 2 characters)
        query: String,

        /// Restrict to movies or series
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<ContentKind>,

        /// Result page, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show the full OMDB record for one IMDb id
    Details {
        imdb_id: String,
    },
    /// Import a single title into the catalog
    Import {
        imdb_id: String,

        #[arg(long = "type", value_name = "TYPE")]
        kind: ContentKind,

        /// Catalog category (defaults to import.default_category_id)
        #[arg(long)]
        category: Option<i64>,

        /// Catalog language (defaults to import.default_language_id)
        #[arg(long)]
        language: Option<i64>,
    },
    /// Import many titles, one after another
    #[command(long_about = "Import a list of IMDb ids. Ids may be given as arguments or read from a file (one per line, commas also accepted). Failures are reported and skipped; the rest of the batch continues.")]
    BulkImport {
        imdb_ids: Vec<String>,

        /// Read ids from this file ('-' for stdin)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        #[arg(long = "type", value_name = "TYPE")]
        kind: ContentKind,

        #[arg(long)]
        category: Option<i64>,

        #[arg(long)]
        language: Option<i64>,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// List titles already in the catalog
    List {
        #[arg(long = "type", value_name = "TYPE")]
        kind: ContentKind,
    },
    /// Manage configuration and the OMDB API key
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Store the OMDB API key in the credentials file
    #[command(long_about = "Store the OMDB API key. Get a free key at https://www.omdbapi.com/apikey.aspx. The MARQUEE_OMDB_API_KEY environment variable overrides the stored key.")]
    Omdb {
        /// API key (prompted for when omitted)
        #[arg(long)]
        api_key: Option<String>,

        /// Remove the stored key
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "api_key")]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let context = match &cli.command {
        Commands::Config { .. } => commands::Context::load_unvalidated()?,
        _ => commands::Context::load()?,
    };

    let log_file = match &cli.command {
        Commands::Serve { log_file, .. } => match log_file {
            Some(Some(path)) => Some(path.clone()),
            Some(None) => Some(context.paths.server_log_file()),
            None => context.config.logging.file.clone(),
        },
        _ => None,
    };
    logging::init_logging(
        cli.verbose,
        cli.quiet,
        &context.config.logging.level,
        logging::use_json(context.config.logging.json),
        log_file.as_deref(),
    )
    .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Serve { host, port, memory, .. } => serve::run_serve(&context, host, port, memory, &output).await,
        Commands::Search { query, kind, page } => catalog::run_search(&context, &query, kind, page, &output).await,
        Commands::Details { imdb_id } => catalog::run_details(&context, &imdb_id, &output).await,
        Commands::Import { imdb_id, kind, category, language } => {
            catalog::run_import(&context, &imdb_id, kind, category, language, &output).await
        }
        Commands::BulkImport { imdb_ids, file, kind, category, language, yes } => {
            catalog::run_bulk_import(&context, imdb_ids, file, kind, category, language, yes, &output).await
        }
        Commands::List { kind } => catalog::run_list(&context, kind, &output).await,
        Commands::Config { cmd } => config::run_config(&context, cmd, &output),
    }
}
