//! Tokio runtime construction.
//!
//! The binary builds its runtime from [`RuntimeOptions`] instead of using the
//! defaults, so worker and blocking thread counts, blocking-thread keep-alive,
//! and thread names are configurable. Thread names carry the configured prefix
//! plus a sequence number, which makes reused threads identifiable in logs.

use crate::config::RuntimeOptions;
use crate::error::{RoutingError, RoutingResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::{Builder, Runtime};
use tracing::{info, trace};

/// Build a multi-thread runtime from `options`.
pub fn build_runtime(options: &RuntimeOptions) -> RoutingResult<Runtime> {
    options.validate().map_err(RoutingError::invalid_input)?;

    let mut builder = Builder::new_multi_thread();
    builder
        .enable_all()
        .max_blocking_threads(options.max_blocking_threads)
        .thread_keep_alive(options.thread_keep_alive());
    if let Some(workers) = options.worker_threads {
        builder.worker_threads(workers);
    }

    let prefix = options.thread_name_prefix.clone();
    let sequence = Arc::new(AtomicUsize::new(1));
    builder.thread_name_fn(move || {
        let n = sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", prefix, n)
    });
    builder.on_thread_start(|| {
        trace!(thread = ?std::thread::current().name(), "Runtime thread started");
    });

    let runtime = builder
        .build()
        .map_err(|e| RoutingError::internal(format!("Failed to build runtime: {}", e)))?;

    info!(
        workers = runtime.metrics().num_workers(),
        max_blocking_threads = options.max_blocking_threads,
        keep_alive_secs = options.thread_keep_alive_secs,
        prefix = %options.thread_name_prefix,
        "Runtime ready"
    );
    Ok(runtime)
}
