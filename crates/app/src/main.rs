use thiserror::Error;

use server::MemoryStore;

mod settings;

#[derive(Debug, Error)]
enum AppError {
    #[error("settings: {0}")]
    Settings(#[from] config::ConfigError),
    #[error("invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Seed(#[from] server::SeedError),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "splitledger={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let store = match &settings.server.seed {
        Some(path) => {
            tracing::info!("Seeding store from {}", path.display());
            MemoryStore::from_seed_file(path)?
        }
        None => MemoryStore::new(),
    };

    let addr = settings.server.addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(store, listener).await?;

    Ok(())
}
