//! Courier: direct messages between registered users, pushed to connected
//! clients over Server-Sent Events.

use events::EventPublisher;
use log::*;
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger, AppState};
use sse::domain_event_handler::SseDomainEventHandler;
use sse::{EventBus, Manager};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
        return ExitCode::FAILURE;
    }

    info!(
        "Starting up Courier [{}] in {} mode",
        config.database_url(),
        config.runtime_env()
    );

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.run_migrations {
        if let Err(e) = Migrator::up(db.as_ref(), None).await {
            error!("Failed to apply database migrations: {e}");
            return ExitCode::FAILURE;
        }
        info!("Database schema is up to date");
    }

    let sse_manager = Arc::new(Manager::new(
        Arc::new(EventBus::new()),
        config.delivery_retry_backoff(),
    ));
    let event_publisher = EventPublisher::new()
        .with_handler(Arc::new(SseDomainEventHandler::new(Arc::clone(&sse_manager))));

    let app_state = AppState::new(config, &db, sse_manager, event_publisher);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
