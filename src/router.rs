//! Router assembly.
//!
//! Builds the writer and reader pools from configuration and wraps them in the
//! routing provider that matches the process mode. Any failure here is a
//! misconfiguration and should stop the process.

use crate::config::{Config, DatabaseProperties, PoolOptions, READER_POOL_NAME, WRITER_POOL_NAME};
use crate::db::{BlockingPool, NamedPool};
use crate::error::{RoutingError, RoutingResult};
use crate::routing::{
    AsyncRoutingProvider, BlockingConnectionSource, BlockingRoutingProvider, ConnectionProviderPair,
    ConnectionSource, ModeRegistry, RouteTarget, RoutingMode,
};
use tokio::runtime::Handle;
use tracing::{error, info};

/// The routing provider for the configured mode.
#[derive(Debug, Clone)]
pub enum Router {
    Sync(BlockingRoutingProvider<BlockingPool>),
    Async(AsyncRoutingProvider<NamedPool>),
}

/// Which pool served a probe for a given target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub target: RouteTarget,
    pub pool: String,
}

impl Router {
    /// Initialize the process mode and connect both pools.
    pub async fn from_config(config: &Config) -> RoutingResult<Self> {
        let mode = ModeRegistry::global().init_from_config(&config.mode);
        let options = config.pool_options()?;
        Self::connect(mode, &config.database_properties(), &options).await
    }

    /// Connect the writer, then the reader, and build the router for `mode`.
    pub async fn connect(
        mode: RoutingMode,
        properties: &DatabaseProperties,
        options: &PoolOptions,
    ) -> RoutingResult<Self> {
        let (writer, reader) = properties.require()?;

        let write = NamedPool::connect(writer, WRITER_POOL_NAME, false, options)
            .await
            .map_err(|e| startup_failure(WRITER_POOL_NAME, e))?;
        let read = match NamedPool::connect(reader, READER_POOL_NAME, true, options).await {
            Ok(pool) => pool,
            Err(e) => {
                write.close().await;
                return Err(startup_failure(READER_POOL_NAME, e));
            }
        };

        let pools = ConnectionProviderPair::new(write, read);
        match Self::from_pools(mode, pools.clone()) {
            Ok(router) => Ok(router),
            Err(e) => {
                for (_, pool) in pools.iter() {
                    pool.close().await;
                }
                Err(e)
            }
        }
    }

    /// Wrap already-built pools.
    ///
    /// Sync mode binds the blocking pools to the current tokio runtime, so it
    /// must be called from inside one.
    pub fn from_pools(
        mode: RoutingMode,
        pools: ConnectionProviderPair<NamedPool>,
    ) -> RoutingResult<Self> {
        let router = match mode {
            RoutingMode::Sync => {
                let handle = Handle::try_current().map_err(|e| {
                    RoutingError::misconfiguration("runtime", format!("No tokio runtime: {}", e))
                })?;
                Router::Sync(BlockingRoutingProvider::new(
                    pools.map(|pool| BlockingPool::new(pool, handle.clone())),
                ))
            }
            RoutingMode::Async => Router::Async(AsyncRoutingProvider::new(pools)),
        };
        info!(mode = %mode, "Routing data source ready");
        Ok(router)
    }

    pub fn mode(&self) -> RoutingMode {
        match self {
            Router::Sync(_) => RoutingMode::Sync,
            Router::Async(_) => RoutingMode::Async,
        }
    }

    /// The physical pools behind the router.
    pub fn pools(&self) -> ConnectionProviderPair<NamedPool> {
        match self {
            Router::Sync(provider) => provider.providers().clone().map(|p| p.pool().clone()),
            Router::Async(provider) => provider.providers().clone(),
        }
    }

    /// Acquire once under each target and run `SELECT 1`.
    ///
    /// Blocking mode runs on the blocking thread pool with a thread-scoped
    /// intent; async mode runs in a transaction scope.
    pub async fn probe(&self) -> RoutingResult<Vec<ProbeResult>> {
        let mut results = Vec::with_capacity(2);
        for target in [RouteTarget::Read, RouteTarget::Write] {
            let pool = match self {
                Router::Sync(provider) => {
                    let provider = provider.clone();
                    tokio::task::spawn_blocking(move || {
                        provider.with_intent(target, || {
                            let mut conn = BlockingConnectionSource::acquire(&provider)?;
                            conn.execute("SELECT 1")?;
                            Ok::<_, RoutingError>(conn.pool_name().to_string())
                        })
                    })
                    .await
                    .map_err(|e| RoutingError::internal(format!("Probe task failed: {}", e)))??
                }
                Router::Async(provider) => {
                    crate::routing::context::with_intent(target, async {
                        let mut conn = ConnectionSource::acquire(provider).await?;
                        conn.execute("SELECT 1").await?;
                        Ok::<_, RoutingError>(conn.pool_name().to_string())
                    })
                    .await?
                }
            };
            info!(target = %target, pool = %pool, "Probe routed");
            results.push(ProbeResult { target, pool });
        }
        Ok(results)
    }

    /// Close both pools.
    pub async fn close(&self) {
        for (_, pool) in self.pools().iter() {
            pool.close().await;
        }
    }
}

fn startup_failure(pool: &str, err: RoutingError) -> RoutingError {
    if err.is_fatal() {
        return err;
    }
    error!(pool = %pool, error = %err, "Failed to initialize connection pool");
    let reason = match err.suggestion() {
        Some(suggestion) => format!("{} ({})", err, suggestion),
        None => err.to_string(),
    };
    RoutingError::misconfiguration(pool, reason)
}
