//! CLI entry point for articles-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use articles_rs::commands::new::NewArticle;

#[derive(Parser)]
#[command(name = "articles-rs")]
#[command(version)]
#[command(about = "Render article pages with SEO metadata and upcoming-post handling", long_about = None)]
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
    /// Create a new article
    New {
        /// Title of the new article
        title: String,

        /// Slug (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,

        /// Publication date, e.g. 2099-01-01 (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Tags, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Pre-render all articles into the public directory
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a server that renders articles on demand
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Clean the public folder
    Clean,

    /// List known articles
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "articles_rs=debug,tower_http=debug,info"
    } else {
        "articles_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::New {
            title,
            slug,
            date,
            tags,
        } => {
            let site = articles_rs::Site::new(&base_dir)?;
            let path = articles_rs::commands::new::create_article(
                &site,
                &NewArticle {
                    title: &title,
                    slug: slug.as_deref(),
                    date: date.as_deref(),
                    tags: &tags,
                },
            )?;
            println!("Created: {:?}", path);
        }

        Commands::Generate { watch } => {
            let site = articles_rs::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            let report = site.generate()?;
            println!(
                "Generated {} articles ({} upcoming)",
                report.articles, report.upcoming
            );

            if watch {
                tokio::task::spawn_blocking(move || articles_rs::commands::generate::watch(&site))
                    .await??;
            }
        }

        Commands::Server { port, ip } => {
            let site = articles_rs::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            articles_rs::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = articles_rs::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let site = articles_rs::Site::new(&base_dir)?;
            articles_rs::commands::list::run(&site)?;
        }

        Commands::Version => {
            println!("articles-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
