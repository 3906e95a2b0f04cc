//! CLI entry point for postfeed

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postfeed::content::PostId;
use postfeed::filter::MonthFilter;

#[derive(Parser)]
#[command(name = "postfeed")]
#[command(version)]
#[command(about = "A small social feed: local posts merged with a static markdown document", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new feed
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Publish a new post
    Post {
        /// Post content
        #[arg(required = true)]
        content: Vec<String>,
    },

    /// List the feed, newest first
    #[command(alias = "ls")]
    List {
        /// Month to show (YYYY-MM) or "all"
        #[arg(short, long, default_value = "all")]
        month: MonthFilter,

        /// Only show favorites
        #[arg(short, long)]
        favorites: bool,
    },

    /// List the months present in the feed
    Months,

    /// Delete one of your posts
    Delete {
        /// Post id
        id: PostId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Add a post to favorites, or remove it
    Favorite {
        /// Post id
        id: PostId,
    },

    /// Render the feed page as HTML
    Render {
        /// Month to show (YYYY-MM) or "all"
        #[arg(short, long, default_value = "all")]
        month: MonthFilter,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start a local server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postfeed=debug,info"
    } else {
        "postfeed=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing feed in {:?}", target_dir);
            postfeed::commands::init::init_feed(&target_dir)?;
            println!("Initialized successfully!");
        }

        Commands::Post { content } => {
            let feed = postfeed::Feed::new(&base_dir)?;
            postfeed::commands::post::run(&feed, &content.join(" ")).await?;
        }

        Commands::List { month, favorites } => {
            let feed = postfeed::Feed::new(&base_dir)?;
            postfeed::commands::list::run(&feed, month, favorites).await?;
        }

        Commands::Months => {
            let feed = postfeed::Feed::new(&base_dir)?;
            postfeed::commands::list::months(&feed).await?;
        }

        Commands::Delete { id, yes } => {
            let feed = postfeed::Feed::new(&base_dir)?;
            postfeed::commands::delete::run(&feed, &id, yes).await?;
        }

        Commands::Favorite { id } => {
            let feed = postfeed::Feed::new(&base_dir)?;
            postfeed::commands::favorite::run(&feed, &id).await?;
        }

        Commands::Render { month, output } => {
            let feed = postfeed::Feed::new(&base_dir)?;
            postfeed::commands::render::run(&feed, month, output.as_deref()).await?;
        }

        Commands::Serve { port, ip } => {
            let feed = postfeed::Feed::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            postfeed::server::start(&feed, &ip, port).await?;
        }

        Commands::Version => {
            println!("postfeed version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
