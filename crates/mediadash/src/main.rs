mod config;

use config::{Config, LogFormat};
use fileserver::FileServerApi;
use library::{CoverClient, FormatTable, MediaLibrary};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    let _ = dotenv::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            eprintln!("Please check your settings in the .env file");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    let mut library = MediaLibrary::new(&config.media_dir, FormatTable::default());
    if config.cover_lookup {
        library = library.with_covers(CoverClient::new());
    } else {
        tracing::info!("Cover lookup disabled");
    }

    let file_server = FileServerApi::new(library);
    if let Err(e) = file_server.serve(&config.host, config.port).await {
        tracing::error!("File server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialise the global tracing subscriber, honouring `RUST_LOG`
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
