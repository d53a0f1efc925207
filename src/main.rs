#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod banner;
mod config;
mod dom;
mod error;
mod explanation;
mod models;
mod poller;
#[cfg_attr(windows, allow(dead_code))]
mod schedule;
#[cfg_attr(windows, allow(dead_code))]
mod terminal;

#[cfg(windows)]
mod native_interop;
#[cfg(windows)]
mod theme;
#[cfg(windows)]
mod window;

use std::process::ExitCode;
use std::sync::Arc;

use config::Config;
use dom::MemoryDocument;
use explanation::LanguagePreference;
use poller::ApiClient;

const USAGE: &str = "usage: astronomical-watch [explain]";

fn main() -> ExitCode {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let config = config::load().unwrap_or_else(|e| {
        log::warn!("Using default settings: {e}");
        Config::default()
    });

    let client = match ApiClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Cannot create HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => run_banner(Arc::new(config), client),
        Some("explain") => {
            run_explanation(&config, &client);
            ExitCode::SUCCESS
        }
        Some(other) => {
            eprintln!("unknown command '{other}'\n{USAGE}");
            ExitCode::from(2)
        }
    }
}

#[cfg(windows)]
fn run_banner(config: Arc<Config>, client: ApiClient) -> ExitCode {
    match window::run(config, client) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Banner window failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(windows))]
fn run_banner(config: Arc<Config>, client: ApiClient) -> ExitCode {
    terminal::run_banner(config, client);
    ExitCode::SUCCESS
}

/// Resolve the language once, fetch the text and show it.
fn run_explanation(config: &Config, client: &ApiClient) {
    let preference = match &config.language {
        Some(tag) => LanguagePreference::pinned(tag.as_str()),
        None => LanguagePreference::from_system(),
    };
    let lang = explanation::resolve_language(&preference);
    log::info!("Explanation language: {lang}");

    let element_id = config.explanation_element_id.as_str();
    let mut document = MemoryDocument::with_elements(&[element_id]);
    explanation::load_explanation(client, &mut document, element_id, lang);

    let text = document
        .element(element_id)
        .map(|e| e.text_content())
        .unwrap_or_default();

    #[cfg(windows)]
    native_interop::show_message(banner::TITLE, &text);
    #[cfg(not(windows))]
    terminal::show_explanation(lang, &text);
}
