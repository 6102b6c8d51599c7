/// Reliva Player - queue playback from the command line
use clap::{Parser, Subcommand};
use reliva_playback::QueueItem;
use reliva_player::{load_queue, play_queue, resolve_item, PlayerAppConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reliva-player")]
#[command(about = "Reliva floating player queue coordinator", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "RELIVA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one item to a playback id
    Resolve {
        /// Song or movie/series title
        #[arg(short, long)]
        title: String,
        /// Artist name, or media label for videos ("movie", "tv")
        #[arg(short, long)]
        secondary: String,
        /// Resolve a trailer instead of a song
        #[arg(long)]
        video: bool,
        /// Release year (videos only)
        #[arg(long, requires = "video")]
        year: Option<u16>,
    },
    /// Play a queue file (JSON array of items)
    Play {
        /// Queue file path
        #[arg(short, long)]
        queue: PathBuf,
        /// Index of the item to start with
        #[arg(short, long, default_value_t = 0)]
        start: usize,
        /// Play through to the end of the queue
        #[arg(long)]
        autoplay: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "reliva_player=info,reliva_playback=info,reliva_resolver=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = PlayerAppConfig::load(cli.config.as_deref())?;
    config.validate()?;
    tracing::debug!(
        base_url = %config.resolver.base_url,
        platform = %config.resolver.platform,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Resolve {
            title,
            secondary,
            video,
            year,
        } => {
            let item = if video {
                QueueItem::video("cli", title, secondary, year)
            } else {
                QueueItem::song("cli", title, secondary)
            };
            let resolution = resolve_item(&config, item).await?;
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }
        Commands::Play {
            queue,
            start,
            autoplay,
        } => {
            let items = load_queue(&queue)?;
            tracing::info!(items = items.len(), start, autoplay, "Playing queue");
            let report = play_queue(&config, items, start, autoplay).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
