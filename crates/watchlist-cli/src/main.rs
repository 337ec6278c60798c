use clap::{ArgAction, Parser, Subcommand};
use std::process::ExitCode;
use watchlist_config::PathManager;
use commands::{config, remove, search, show};
use context::AppContext;

mod commands;
mod context;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Browse popular and upcoming movies and keep a personal watchlist")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to the daily-rotated log file instead of stderr
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a menu screen: watchlist, popular or upcoming
    #[command(long_about = "Navigate to one of the menu screens and list its movies. Catalog screens (popular, upcoming) accept --page and --add to save one of the listed movies to the watchlist.")]
    Show {
        /// Menu item to open
        #[arg(value_name = "SCREEN")]
        screen: String,

        /// Catalog page to load (popular and upcoming only)
        #[arg(long)]
        page: Option<u32>,

        /// Add the movie with this list number to the watchlist
        #[arg(long, value_name = "N")]
        add: Option<usize>,
    },
    /// Search the catalog by title
    Search {
        /// Title to search for
        query: String,

        /// Add the movie with this list number to the watchlist
        #[arg(long, value_name = "N")]
        add: Option<usize>,
    },
    /// Remove movies from the watchlist
    #[command(long_about = "Select watchlist entries by list number (or interactively when none are given) and delete them after confirmation.")]
    Remove {
        /// List numbers as shown by 'watchlist show watchlist'
        #[arg(value_name = "N")]
        numbers: Vec<usize>,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Manage configuration
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

    /// Write a configuration file template
    Init {
        /// TMDB API key to store
        #[arg(long)]
        api_key: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    /// Print config, database and log file locations
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();

    let log_file = cli.log_file.then(|| paths.log_file());
    logging::init_logging(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Config { cmd } => {
            config::run_config(cmd, &paths, &output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show { screen, page, add } => {
            let ctx = AppContext::load(&paths).await?;
            show::run_show(&ctx, &screen, page, add, &output).await
        }
        Commands::Search { query, add } => {
            let ctx = AppContext::load(&paths).await?;
            search::run_search(&ctx, &query, add, &output).await
        }
        Commands::Remove { numbers, yes } => {
            let ctx = AppContext::load(&paths).await?;
            remove::run_remove(&ctx, numbers, yes, &output).await
        }
    }
}
