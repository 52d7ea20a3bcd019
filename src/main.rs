use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use multitimer::commands::timer::EditArgs;
use multitimer::store::TimerStore;
use multitimer::timer::{MAX_INTERVAL_SECS, MAX_RINGS};
use multitimer::{OutputFormat, commands, config, platform};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mtimer")]
#[command(about = "Named countdown timers with desktop notifications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new timer
    Add {
        #[arg(help = "Timer title (1-18 characters)")]
        title: String,
        #[arg(long, help = "Countdown length (seconds or [HH:]MM:SS)")]
        duration: String,
        #[arg(long, default_value = "", help = "Notification message (up to 80 characters)")]
        message: String,
        #[arg(
            long,
            default_value_t = 0,
            value_parser = clap::value_parser!(u32).range(0..=MAX_RINGS as i64),
            help = "Extra notifications after the timer ends"
        )]
        rings: u32,
        #[arg(
            long,
            default_value_t = 0,
            value_parser = clap::value_parser!(u32).range(0..=MAX_INTERVAL_SECS as i64),
            help = "Seconds between extra notifications"
        )]
        interval: u32,
    },
    /// Edit an existing timer
    Edit {
        #[arg(help = "Title of the timer to edit")]
        title: String,
        #[arg(long, help = "New title")]
        rename: Option<String>,
        #[arg(long, help = "New notification message")]
        message: Option<String>,
        #[arg(long, help = "New countdown length (seconds or [HH:]MM:SS)")]
        duration: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_RINGS as i64))]
        rings: Option<u32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_INTERVAL_SECS as i64))]
        interval: Option<u32>,
    },
    /// Remove a timer
    Rm {
        #[arg(help = "Title of the timer to remove")]
        title: String,
    },
    /// List stored timers
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show timer details
    Show {
        #[arg(help = "Timer title")]
        title: String,
    },
    /// Run timers in the foreground until they finish
    Start {
        #[arg(help = "Titles of the timers to run")]
        titles: Vec<String>,
        #[arg(long, help = "Run every stored timer")]
        all: bool,
    },
    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Set { key: String, value: String },
    Get { key: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load()?;

    let data_dir = platform::get_data_dir(config.storage.data_dir_override.as_ref())?;
    let store = TimerStore::open(&data_dir);

    match &cli.command {
        Commands::Add {
            title,
            duration,
            message,
            rings,
            interval,
        } => {
            commands::timer::add(&store, title, duration, message, *rings, *interval)?;
        }
        Commands::Edit {
            title,
            rename,
            message,
            duration,
            rings,
            interval,
        } => {
            let args = EditArgs {
                rename: rename.clone(),
                message: message.clone(),
                duration: duration.clone(),
                rings: *rings,
                interval: *interval,
            };
            commands::timer::edit(&store, title, args)?;
        }
        Commands::Rm { title } => {
            commands::timer::remove(&store, title)?;
        }
        Commands::List { format } => {
            commands::timer::list(&store, *format)?;
        }
        Commands::Show { title } => {
            commands::timer::show(&store, title)?;
        }
        Commands::Start { titles, all } => {
            tokio::runtime::Runtime::new()?
                .block_on(commands::run::run(&config, &store, titles, *all))?;
        }
        Commands::Config(args) => match &args.action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Set { key, value } => commands::config::set(&config, key, value)?,
            ConfigAction::Get { key } => commands::config::get(key, &config)?,
        },
    }

    Ok(())
}
