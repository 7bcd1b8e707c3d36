use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;

use random_image_bot::application::image::{HtmlResolver, JsonResolver};
use random_image_bot::application::messaging::MessageDispatcher;
use random_image_bot::build_dispatcher;
use random_image_bot::domain::entities::User;
use random_image_bot::domain::traits::{Bot, HttpClient, SystemClock};
use random_image_bot::infrastructure::adapters::ConsoleAdapter;
use random_image_bot::infrastructure::config::{Config, ConsoleConfig};
use random_image_bot::infrastructure::http::ReqwestHttpClient;

#[derive(Parser)]
#[command(name = "random-image-bot")]
#[command(about = "Chat bot plugins that answer with a random wenturc image", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (console adapter)
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Resolve one image URL and print it
    Fetch {
        #[arg(value_enum, default_value_t = Variant::Json)]
        variant: Variant,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    /// Scrape the random HTML page
    Html,
    /// Query the JSON endpoint
    Json,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_bot(&cli.config),
        Commands::Version => {
            println!("random-image-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => init_config(),
        Commands::Fetch { variant } => fetch_once(&cli.config, variant),
    }
}

fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start tokio runtime: {}", e);
            std::process::exit(1);
        }
    }
}

fn http_client(config: &Config) -> Arc<dyn HttpClient> {
    match ReqwestHttpClient::new(&config.http) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run_bot(config_path: &str) {
    let config = Config::load_or_default(config_path);
    tracing::info!("Starting {}", config.bot.name);

    let http = http_client(&config);
    let dispatcher = match build_dispatcher(&config, http, Arc::new(SystemClock)) {
        Ok(d) => Arc::new(d),
        Err(e) => {
            tracing::error!("Failed to set up plugins: {}", e);
            std::process::exit(1);
        }
    };

    let console = config.adapters.console.clone().unwrap_or_else(|| {
        tracing::warn!("No console adapter configured, using defaults");
        ConsoleConfig::default()
    });
    if !console.enabled {
        tracing::error!("Console adapter is disabled; nothing to run");
        return;
    }

    let mut user = User::new(console.user_id);
    if let Some(nickname) = console.nickname {
        user = user.with_nickname(nickname);
    }

    let rt = runtime();
    rt.block_on(async {
        let bot = Arc::new(ConsoleAdapter::new(user));
        run_console_bot(bot, dispatcher).await;
    });
}

async fn run_console_bot(
    bot: Arc<ConsoleAdapter>,
    dispatcher: Arc<MessageDispatcher>,
) {
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{} (type exit to quit)", info.username);

    // Each line runs as its own task so slow downloads don't block input
    while let Some(input) = bot.read_line("> ").await {
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        let bot = bot.clone();
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let sender = Some(bot.user().clone());
            if let Err(e) = dispatcher.process_text(bot.as_ref(), "console", input, sender).await {
                tracing::error!("Dispatch failed: {}", e);
            }
        });
    }

    tracing::info!("Console closed");
}

fn fetch_once(config_path: &str, variant: Variant) {
    let config = Config::load_or_default(config_path);
    let http = http_client(&config);

    let rt = runtime();
    let result = rt.block_on(async {
        match variant {
            Variant::Html => HtmlResolver::new(http, &config.wenturc.base_url).resolve().await,
            Variant::Json => JsonResolver::new(http, &config.wenturc.base_url).resolve().await,
        }
    });

    match result {
        Ok(url) => println!("{}", url),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => {
            eprintln!("Failed to render config: {}", e);
            std::process::exit(1);
        }
    }
}
