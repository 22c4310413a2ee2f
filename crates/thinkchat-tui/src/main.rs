use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use thinkchat_core::settings::DEFAULT_TEMPERATURE;
use thinkchat_core::{ChatSession, Config, ReasonClient, Settings};

mod app;
mod handler;
mod markup;
mod tui;
mod ui;

use app::App;

#[derive(Parser, Debug)]
#[command(name = "thinkchat")]
#[command(version, about = "Chat with a chain-of-thought reasoning server")]
struct Cli {
    /// Reasoning server URL (overrides THINKCHAT_URL and the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// Your question
        query: String,
        /// Sampling temperature, 0.0 to 1.0
        #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f32,
        /// Ask for a plain answer instead of reasoning steps
        #[arg(long)]
        unstructured: bool,
        /// Do not let the server call tools
        #[arg(long)]
        no_tools: bool,
        /// Print the rendered HTML fragment instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Check that the server is up
    Health,
}

/// Log to stderr, or to a file while the terminal belongs to the TUI.
fn init_logging(to_file: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,thinkchat_core=info"));

    if to_file {
        let log_file = dirs::data_dir()
            .map(|dir| dir.join("thinkchat"))
            .and_then(|dir| fs::create_dir_all(&dir).ok().map(|_| dir.join("thinkchat.log")))
            .and_then(|path| File::options().create(true).append(true).open(path).ok());

        // No log file means no logging; stderr would corrupt the screen
        if let Some(file) = log_file {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.is_none());

    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "failed to load config, using defaults");
        Config::new()
    });
    let client = ReasonClient::new(&config.resolve_server_url(cli.url.as_deref()));

    match cli.command {
        None => run_tui(client, &config).await,
        Some(Commands::Ask {
            query,
            temperature,
            unstructured,
            no_tools,
            html,
        }) => {
            let mut settings = Settings::default();
            settings.set_temperature(temperature);
            settings.structured_output = !unstructured;
            settings.use_tools = !no_tools;
            ask(&client, query, &settings, html).await
        }
        Some(Commands::Health) => health(&client).await,
    }
}

async fn run_tui(client: ReasonClient, config: &Config) -> Result<()> {
    let config_path = Config::get_config_path()
        .map_err(|err| warn!(error = %err, "theme changes will not be saved"))
        .ok();
    info!(server = client.base_url(), "starting tui");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(client, config.theme(), config_path);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut tui::Tui, app: &mut App, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    if let Some(task) = app.request_task.take() {
        task.abort();
    }
    Ok(())
}

async fn ask(client: &ReasonClient, query: String, settings: &Settings, html: bool) -> Result<()> {
    let mut session = ChatSession::new();
    let mut input = query;

    if !session.submit(client, &mut input, settings).await {
        anyhow::bail!("Query is empty");
    }

    let Some(reply) = session.transcript.last() else {
        anyhow::bail!("No reply recorded");
    };

    if html {
        println!("{}", reply.to_html());
    } else {
        let text: Vec<String> = reply.blocks.iter().map(markup::block_to_plain_text).collect();
        println!("{}", text.join("\n\n"));
    }

    if reply.is_error() {
        anyhow::bail!("Request failed");
    }
    Ok(())
}

async fn health(client: &ReasonClient) -> Result<()> {
    let status = client.health().await?;
    match status.version {
        Some(version) => println!("{}: {} (version {})", client.base_url(), status.status, version),
        None => println!("{}: {}", client.base_url(), status.status),
    }
    Ok(())
}
