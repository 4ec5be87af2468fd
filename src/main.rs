mod bluesky;
mod moon_api;
mod publisher;

use clap::{Args, Parser, Subcommand};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use moonbot::config::{BotConfig, MessageConfig};
use moonbot::message;
use moonbot::phase::MoonPhase;
use moonbot::scheduler::{DailyScheduler, SystemClock};
use moonbot::Month;

#[derive(Parser)]
#[command(name = "moonbot", about = "Daily moon phase bot for Bluesky")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scheduler and post once per UTC day
    Run(RunArgs),
    /// Compose and publish a single post, then exit
    Post(RunArgs),
    /// Print sample messages for every month and phase without posting
    Preview,
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Run(RunArgs::default()));

    match command {
        Command::Run(args) => run_scheduler(args).await,
        Command::Post(args) => run_post(args).await,
        Command::Preview => run_preview(),
    }
}

async fn run_scheduler(args: RunArgs) -> Result<(), String> {
    let (config, path) = BotConfig::load(args.config)?;
    if let Some(path) = path.as_ref().filter(|path| path.exists()) {
        info!("loaded config from {}", path.display());
    }

    let publisher = build_publisher(config.message.clone())?;
    let mut scheduler = DailyScheduler::new(SystemClock, &config.scheduler);
    scheduler.run(|| publisher.publish_today()).await;
    Ok(())
}

async fn run_post(args: RunArgs) -> Result<(), String> {
    let (config, _) = BotConfig::load(args.config)?;
    let publisher = build_publisher(config.message)?;
    publisher.publish_today().await
}

fn build_publisher(config: MessageConfig) -> Result<publisher::MoonPostPublisher, String> {
    publisher::MoonPostPublisher::from_env(config).ok_or_else(|| {
        "missing Bluesky credentials: set BLUESKY_USERNAME and BLUESKY_PASSWORD".to_string()
    })
}

fn run_preview() -> Result<(), String> {
    let config = MessageConfig::default();
    let mut rng = rand::thread_rng();
    let now = chrono::Utc::now();

    for month in Month::ALL {
        println!("\n--- {} ---", month.name().to_uppercase());

        for phase in MoonPhase::ALL {
            let illumination = rng.gen::<f64>() * 100.0;
            let composed =
                message::compose_with_rng(phase.name(), illumination, month.index(), &config, &mut rng)
                    .map_err(|err| err.to_string())?;
            let record = publisher::build_post_record(&composed, now);
            let json = serde_json::to_string_pretty(&record)
                .map_err(|err| format!("failed to render record: {}", err))?;

            println!("Phase: {}", phase.name());
            println!("Message: {}", composed.text);
            println!("Length: {} characters", composed.text.chars().count());
            println!("Record: {}", json);
            println!("---");
        }
    }

    Ok(())
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
