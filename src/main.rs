use clap::Parser;
use docs_chat::core::config::{self, ChatConfig, CliOverrides};
use docs_chat::{BackendKind, Theme, tui};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "docs-chat", about = "Terminal chat client for a documentation assistant")]
struct Args {
    /// Where replies come from
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,

    /// Full URL of the session endpoint
    #[arg(long)]
    session_url: Option<String>,

    /// Full URL of the streaming chat endpoint
    #[arg(long)]
    chat_url: Option<String>,

    /// Color theme
    #[arg(short, long, value_enum)]
    theme: Option<Theme>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Config is read before the logger exists; a broken file falls back to defaults
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (ChatConfig::default(), Some(e)),
    };
    let cli = CliOverrides {
        backend: args.backend,
        theme: args.theme,
        session_url: args.session_url,
        chat_url: args.chat_url,
    };
    let resolved = config::resolve(&file_config, &cli);

    // File logger: the terminal belongs to the TUI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    for warning in &resolved.warnings {
        log::warn!("{}", warning);
    }
    log::info!("docs-chat starting up with backend: {:?}", resolved.backend);

    tui::run(resolved)
}
