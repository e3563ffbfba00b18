//! Periodic pool and runtime statistics.
//!
//! Logs the size and idle count of the writer and reader pools, and the worker
//! count, live tasks and global queue depth of the runtime they run on, at a
//! fixed interval until both pools are closed.

use crate::db::pool::NamedPool;
use crate::routing::{ConnectionProviderPair, RouteTarget};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// One pool's statistics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub pool: String,
    pub target: RouteTarget,
    /// Open connections, idle or in use
    pub size: u32,
    pub idle: usize,
}

/// Runtime executor statistics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeStats {
    pub workers: usize,
    pub alive_tasks: usize,
    /// Tasks waiting in the shared injection queue
    pub global_queue_depth: usize,
}

pub struct PoolMonitor;

impl PoolMonitor {
    /// Current statistics for both pools, writer first.
    pub fn snapshot(pools: &ConnectionProviderPair<NamedPool>) -> Vec<PoolStats> {
        pools
            .iter()
            .map(|(target, pool)| PoolStats {
                pool: pool.name().to_string(),
                target,
                size: pool.pool().size(),
                idle: pool.pool().num_idle(),
            })
            .collect()
    }

    /// Current statistics for the runtime behind `handle`.
    pub fn runtime_snapshot(handle: &Handle) -> RuntimeStats {
        let metrics = handle.metrics();
        RuntimeStats {
            workers: metrics.num_workers(),
            alive_tasks: metrics.num_alive_tasks(),
            global_queue_depth: metrics.global_queue_depth(),
        }
    }

    /// Spawn the logging task. Abort the returned handle to stop it early.
    pub fn start(pools: ConnectionProviderPair<NamedPool>, interval: Duration) -> JoinHandle<()> {
        let handle = Handle::current();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if pools.iter().all(|(_, pool)| pool.pool().is_closed()) {
                    debug!("Pools closed, stopping monitor");
                    break;
                }
                for stats in Self::snapshot(&pools) {
                    info!(
                        pool = %stats.pool,
                        target = %stats.target,
                        size = stats.size,
                        idle = stats.idle,
                        "Pool statistics"
                    );
                }
                let runtime = Self::runtime_snapshot(&handle);
                info!(
                    workers = runtime.workers,
                    alive_tasks = runtime.alive_tasks,
                    global_queue_depth = runtime.global_queue_depth,
                    "Runtime statistics"
                );
            }
        })
    }
}
