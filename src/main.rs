//! SearchDesk: desktop client for a web search agent backend
//!
//! Usage:
//!   searchdesk                      - Start the desktop app
//!   searchdesk search <query>       - Search the web
//!   searchdesk read <url>           - Extract a page as Markdown
//!   searchdesk research <topic>     - Run a deep research report
//!   searchdesk summarize <url>      - Summarize a page
//!   searchdesk graph <topic>        - Print Mermaid mind map source
//!   searchdesk status               - Check the backend
//!   searchdesk help                 - Show help

mod app;
mod backend;
mod config;
mod diagram;
mod markdown;
mod native;
mod shell;
mod ui;

use std::env;
use std::sync::Arc;

use app::SearchDesk;
use backend::api::BackendClient;
use backend::types::Capability;
use config::Settings;
use diagram::mmdc::MermaidCli;
use iced::{window, Size};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> iced::Result {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let settings = Settings::load();
    let args: Vec<String> = env::args().skip(1).collect();

    match args.split_first() {
        Some((cmd, rest)) => {
            handle_cli_command(&settings, cmd, rest);
            Ok(())
        }
        None => start_gui(&settings),
    }
}

fn handle_cli_command(settings: &Settings, cmd: &str, rest: &[String]) {
    if matches!(cmd, "help" | "--help" | "-h") {
        print_help();
        return;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };
    let client = BackendClient::new(&settings.api_base());

    if cmd == "status" {
        match rt.block_on(client.health()) {
            Ok(health) => println!("Backend at {} is {}: {}", client.base_url(), health.status, health.message),
            Err(e) => {
                eprintln!("Error: {} ({})", e, client.base_url());
                std::process::exit(1);
            }
        }
        return;
    }

    let Some(capability) = Capability::from_name(cmd) else {
        eprintln!("Unknown command: {}", cmd);
        eprintln!("Run 'searchdesk help' for usage");
        std::process::exit(1);
    };

    let input = rest.join(" ");
    if input.trim().is_empty() {
        eprintln!("Usage: searchdesk {} <input>", capability.name());
        std::process::exit(1);
    }

    match rt.block_on(client.invoke(capability, input.trim())) {
        Ok(result) => println!("{}", result),
        Err(e) => {
            tracing::debug!("{} request failed: {:?}", capability, e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("SearchDesk - desktop client for a web search agent\n");
    println!("Usage: searchdesk [command] [input...]\n");
    println!("Commands:");
    println!("  (none)              Start the desktop app");
    println!("  search <query>      Search the web");
    println!("  read <url>          Extract a page as Markdown");
    println!("  research <topic>    Run a deep research report (~30s)");
    println!("  summarize <url>     Summarize a page");
    println!("  graph <topic>       Print Mermaid mind map source");
    println!("  status              Check that the backend is reachable");
    println!("  help                Show this help message");
    println!(
        "\nBackend: ${} or api_url in {}",
        config::API_URL_ENV,
        Settings::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "the config directory".to_string())
    );
}

fn start_gui(settings: &Settings) -> iced::Result {
    tracing::info!("Starting SearchDesk...");

    let backend = BackendClient::new(&settings.api_base());
    tracing::info!("Using backend at {}", backend.base_url());

    let mmdc = MermaidCli::new(settings.mmdc_program());
    tracing::info!("Rendering mind maps with {:?}", mmdc.program());
    let renderer: Arc<dyn diagram::DiagramRenderer> = Arc::new(mmdc);

    iced::application("Web Search Agent", SearchDesk::update, SearchDesk::view)
        .theme(SearchDesk::theme)
        .window(window::Settings {
            size: Size::new(1024.0, 800.0),
            position: window::Position::Centered,
            min_size: Some(Size::new(560.0, 480.0)),
            resizable: true,
            ..Default::default()
        })
        .antialiasing(true)
        .run_with(move || SearchDesk::new(backend, renderer))
}
