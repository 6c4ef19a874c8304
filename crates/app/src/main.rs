use migration::{Migrator, MigratorTrait};

use error::AppError;
use settings::{Database, Settings};

mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledger={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect(&settings.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let listener = tokio::net::TcpListener::bind(settings.address()).await?;
    if let Err(err) = server::run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
        return Err(err.into());
    }

    Ok(())
}

async fn connect(config: &Database) -> Result<sea_orm::DatabaseConnection, AppError> {
    tracing::info!("connecting to {}", config.url());
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
