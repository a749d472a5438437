/// Retro Rhythm uploader - audio files into the catalog
use clap::{Parser, Subcommand};
use retro_uploader::{commands, UploaderConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "retro-uploader")]
#[command(about = "Upload audio files to Retro Rhythm and browse the catalog", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./retro.toml when present)
    #[arg(short, long, global = true, env = "RETRO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload audio files or directories of audio files
    Upload {
        /// Files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List tracks, newest first
    List,
    /// Store a track duration in seconds
    SetDuration {
        /// Track id
        id: String,
        /// Duration in seconds
        seconds: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retro_uploader=info,retro_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = UploaderConfig::load(cli.config.as_deref())?;
    let client = commands::connect(&config).await?;

    match cli.command {
        Commands::Upload { paths } => {
            let summary = commands::upload(&client, &paths).await?;
            for track in &summary.uploaded {
                println!("{}", commands::track_line(track));
            }
            for (path, error) in &summary.failed {
                eprintln!("{}: {}", path.display(), error);
            }
            summary.into_result()?;
        }
        Commands::List => {
            for line in commands::list(&client).await? {
                println!("{}", line);
            }
        }
        Commands::SetDuration { id, seconds } => {
            commands::set_duration(&client, &id, seconds).await?;
        }
    }

    Ok(())
}
