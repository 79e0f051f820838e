//! CLI entry and dispatch.

use anyhow::{Context, Result};
use bloglist_core::config::Config;
use bloglist_core::logging;
use clap::Parser;
use tracing::debug;

use crate::modes;

pub(crate) mod commands;

#[derive(Parser)]
#[command(name = "bloglist")]
#[command(version)]
#[command(about = "Terminal client for the bloglist API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Lists blogs, most liked first
    List,

    /// Shows one blog with its details
    Show {
        /// The ID of the blog to show
        #[arg(value_name = "BLOG_ID")]
        id: String,
    },

    /// Logs in and saves the session
    Login {
        /// Username (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted if omitted)
        #[arg(short, long, env = "BLOGLIST_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Logs out and forgets the saved session
    Logout,

    /// Shows the saved session
    Whoami,

    /// Creates a blog as the logged-in user
    Create {
        /// Title of the blog
        #[arg(short, long)]
        title: String,

        /// URL of the blog
        #[arg(short, long)]
        url: String,
    },

    /// Likes a blog
    Like {
        /// The ID of the blog to like
        #[arg(value_name = "BLOG_ID")]
        id: String,
    },

    /// Updates fields of a blog
    Update {
        /// The ID of the blog to update
        #[arg(value_name = "BLOG_ID")]
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New author
        #[arg(long)]
        author: Option<String>,

        /// New URL
        #[arg(long)]
        url: Option<String>,

        /// New like count
        #[arg(long)]
        likes: Option<u64>,
    },

    /// Removes a blog you created
    Remove {
        /// The ID of the blog to remove
        #[arg(value_name = "BLOG_ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Starts the interactive shell (default)
    Shell,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best effort; the client works without it.
    let _log_guard = logging::init().ok();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    debug!(api_url = %config.api_url, "config loaded");

    // default to the interactive shell
    let Some(command) = cli.command else {
        return modes::shell::run(&config).await;
    };

    match command {
        Commands::List => commands::posts::list(&config).await,
        Commands::Show { id } => commands::posts::show(&config, &id).await,
        Commands::Login { username, password } => {
            commands::auth::login(&config, username, password).await
        }
        Commands::Logout => commands::auth::logout(&config).await,
        Commands::Whoami => commands::auth::whoami(),
        Commands::Create { title, url } => commands::posts::create(&config, &title, &url).await,
        Commands::Like { id } => commands::posts::like(&config, &id).await,
        Commands::Update {
            id,
            title,
            author,
            url,
            likes,
        } => {
            let changes = bloglist_core::models::PostUpdate {
                title,
                author,
                url,
                likes,
            };
            commands::posts::update(&config, &id, &changes).await
        }
        Commands::Remove { id, yes } => commands::posts::remove(&config, &id, yes).await,
        Commands::Shell => modes::shell::run(&config).await,
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
