use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use tp_api::app::create_app;
use tp_api::config::{init_tracing, load_config};
use tp_api::routes::auth::AppState;
use tp_core::repositories::{InMemoryTokenRepository, TokenRepository};
use tp_core::services::token::{TokenCleanupService, TokenService, TokenServiceConfig};
use tp_infra::{run_migrations, DatabasePool, MySqlTokenRepository};
use tp_shared::StorageBackend;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging);

    info!(
        environment = %config.environment,
        storage = ?config.storage,
        "Starting TokenPair API Server"
    );
    info!(
        config = %serde_json::to_string(&config).unwrap_or_default(),
        "Effective configuration"
    );

    if config.token.is_using_default_secret() && !config.environment.is_development() {
        warn!("JWT_SIGNATURE is not set; access tokens are signed with the default secret");
    }

    let mut database: Option<DatabasePool> = None;
    let repository: Arc<dyn TokenRepository> = match config.storage {
        StorageBackend::Memory => {
            if config.environment.is_production() {
                warn!("In-memory credential store in production; refresh tokens will not survive a restart");
            }
            Arc::new(InMemoryTokenRepository::new())
        }
        StorageBackend::Mysql => {
            let pool = DatabasePool::new(config.database.clone())
                .await
                .context("Failed to connect to the credential store")?;
            run_migrations(pool.get_pool())
                .await
                .context("Failed to migrate the credential store")?;
            let repository = MySqlTokenRepository::new(pool.get_pool().clone());
            database = Some(pool);
            Arc::new(repository)
        }
    };

    let token_service = Arc::new(TokenService::new(
        repository.clone(),
        TokenServiceConfig::from(&config.token),
    ));

    let cleanup = Arc::new(TokenCleanupService::new(repository, config.cleanup.clone()));
    let cleanup_task = cleanup.start_background_task();

    let app_state = web::Data::new(AppState::new(token_service));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server =
        HttpServer::new(move || create_app(app_state.clone()).wrap(TracingLogger::default()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(task) = cleanup_task {
        task.abort();
    }
    if let Some(pool) = database {
        pool.close().await;
    }

    info!("Server stopped");
    Ok(())
}
