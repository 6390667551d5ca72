use async_trait::async_trait;
use rubrica_api_types::{HealthReport, HealthServices, HealthStatus, ServiceHealth};
use time::OffsetDateTime;
use tracing::warn;

use crate::application::cache::CacheService;
use crate::application::repos::RepoError;

/// Liveness probe seam for the database adapter.
#[async_trait]
pub trait DbHealth: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}

/// Probes both backing services and folds the results into one status:
/// everything reachable is OK, everything down is Error, anything in
/// between is Partial. A disabled cache never degrades the status.
pub async fn health_report(db: &dyn DbHealth, cache: Option<&CacheService>) -> HealthReport {
    let database = match db.ping().await {
        Ok(()) => ServiceHealth::Ok,
        Err(err) => {
            warn!(error = %err, "database health probe failed");
            ServiceHealth::Down
        }
    };

    let cache_health = match cache {
        Some(cache) => match cache.ping().await {
            Ok(()) => ServiceHealth::Ok,
            Err(err) => {
                warn!(error = %err, "cache health probe failed");
                ServiceHealth::Down
            }
        },
        None => ServiceHealth::Disabled,
    };

    let status = match (database, cache_health) {
        (ServiceHealth::Ok, ServiceHealth::Ok | ServiceHealth::Disabled) => HealthStatus::Ok,
        (ServiceHealth::Down, ServiceHealth::Down) => HealthStatus::Error,
        _ => HealthStatus::Partial,
    };

    HealthReport {
        status,
        services: HealthServices {
            database,
            cache: cache_health,
        },
        timestamp: OffsetDateTime::now_utc(),
    }
}
