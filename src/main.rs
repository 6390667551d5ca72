use std::process;
use std::sync::Arc;

use rubrica::{
    application::{
        cache::CacheService, error::AppError, posts::PostService, tasks::TaskService,
        users::UserService,
    },
    config,
    infra::{
        cache::RedisCache,
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AppState},
        telemetry,
    },
};
use sqlx::postgres::PgPool;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn init_pool(settings: &config::Settings) -> Result<PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(pool)
}

/// Connects to Redis when caching is enabled. A failed connection downgrades
/// the process to database-only mode instead of refusing to start.
async fn init_cache(settings: &config::Settings) -> Option<Arc<CacheService>> {
    if !settings.cache.enabled {
        info!(target = "rubrica::startup", "caching disabled");
        return None;
    }

    let url = settings.cache.url.as_deref()?;
    match RedisCache::connect(url).await {
        Ok(store) => {
            info!(target = "rubrica::startup", "connected to redis");
            Some(Arc::new(CacheService::new(
                Arc::new(store),
                settings.cache.default_ttl,
                settings.cache.user_list_ttl,
            )))
        }
        Err(err) => {
            warn!(
                target = "rubrica::startup",
                error = %err,
                "redis unreachable, continuing without cache"
            );
            None
        }
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pool = init_pool(&settings).await?;
    let repositories = Arc::new(PostgresRepositories::new(pool));
    let cache = init_cache(&settings).await;

    let state = AppState {
        users: UserService::new(repositories.clone(), cache.clone()),
        tasks: TaskService::new(repositories.clone()),
        posts: PostService::new(repositories.clone(), repositories.clone()),
        cache,
        db: repositories,
    };

    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;

    info!(
        target = "rubrica::startup",
        addr = %settings.server.addr,
        "listening"
    );

    let graceful = settings.server.graceful_shutdown;
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(());
        },
    );

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))
        }
        () = async {
            let _ = shutdown_rx.await;
            tokio::time::sleep(graceful).await;
        } => {
            warn!(
                timeout_secs = graceful.as_secs(),
                "graceful shutdown deadline exceeded, aborting open connections"
            );
            Ok(())
        }
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = init_pool(&settings).await?;
    pool.close().await;
    info!(target = "rubrica::migrate", "migrations applied");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!(target = "rubrica::shutdown", "shutdown signal received");
}
