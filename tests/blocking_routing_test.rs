//! Integration tests for the blocking routing provider.
//!
//! Tests verify that:
//! - Unmarked work is routed to the read provider
//! - Marked write work is routed to the write provider until cleared
//! - A failed unit of work does not leak its intent to the next one on a reused thread

use rw_router::RoutingResult;
use rw_router::routing::{
    BlockingConnectionSource, BlockingRoutingProvider, ConnectionProviderPair, RouteTarget,
    ThreadIntent,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

struct Labelled(&'static str);

impl BlockingConnectionSource for Labelled {
    type Connection = &'static str;

    fn acquire(&self) -> RoutingResult<Self::Connection> {
        Ok(self.0)
    }
}

fn router() -> BlockingRoutingProvider<Labelled> {
    BlockingRoutingProvider::new(ConnectionProviderPair::new(
        Labelled("write"),
        Labelled("read"),
    ))
}

/// A single worker thread that runs jobs in order, like a pooled request thread.
struct ReusedThread {
    jobs: Option<mpsc::Sender<Box<dyn FnOnce() + Send>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ReusedThread {
    fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Box<dyn FnOnce() + Send>>();
        let handle = thread::spawn(move || {
            for job in rx {
                // A failing unit of work must not take the worker down.
                let _ = catch_unwind(AssertUnwindSafe(job));
            }
        });
        Self {
            jobs: Some(tx),
            handle: Some(handle),
        }
    }

    fn run<R: Send + 'static>(&self, job: impl FnOnce() -> R + Send + 'static) -> Option<R> {
        let (tx, rx) = mpsc::channel();
        self.jobs
            .as_ref()
            .unwrap()
            .send(Box::new(move || {
                let _ = tx.send(job());
            }))
            .unwrap();
        rx.recv().ok()
    }

    fn thread_id(&self) -> thread::ThreadId {
        self.run(|| thread::current().id()).unwrap()
    }
}

impl Drop for ReusedThread {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[test]
fn test_mark_write_acquire_clear_acquire() {
    let router = router();

    router.mark_write();
    assert_eq!(router.acquire().unwrap(), "write");

    router.clear();
    assert_eq!(router.acquire().unwrap(), "read");
}

#[test]
fn test_no_mark_routes_to_read() {
    let router = router();
    assert_eq!(router.acquire().unwrap(), "read");
    assert_eq!(router.resolve_target(), RouteTarget::Read);
}

#[test]
fn test_mark_read_after_write_routes_to_read() {
    let router = router();
    router.mark_write();
    router.mark_read();
    assert_eq!(router.acquire().unwrap(), "read");
    router.clear();
}

#[test]
fn test_failed_unit_does_not_leak_intent_to_reused_thread() {
    let router = Arc::new(router());
    let worker = ReusedThread::new();
    let first_thread = worker.thread_id();

    // Unit A marks write and fails without clearing.
    let unit_a = {
        let router = Arc::clone(&router);
        worker.run(move || {
            router.with_intent(RouteTarget::Write, || {
                let conn = router.acquire().unwrap();
                if conn == "write" {
                    panic!("unit A failed");
                }
                conn
            })
        })
    };
    assert!(unit_a.is_none(), "unit A should not have produced a result");

    // Unit B runs on the same thread and must see the default.
    let unit_b = {
        let router = Arc::clone(&router);
        worker.run(move || (thread::current().id(), router.acquire().unwrap()))
    };
    let (second_thread, served_by) = unit_b.unwrap();
    assert_eq!(first_thread, second_thread);
    assert_eq!(served_by, "read");
}

#[test]
fn test_early_return_error_restores_intent() {
    let router = router();

    let outcome: Result<(), String> = router.transactional(false, || {
        assert_eq!(router.acquire().unwrap(), "write");
        Err("validation failed".to_string())
    });

    assert!(outcome.is_err());
    assert_eq!(ThreadIntent::current(), None);
    assert_eq!(router.acquire().unwrap(), "read");
}

#[test]
fn test_scope_restores_explicit_outer_mark() {
    let router = router();
    router.mark_write();
    {
        let _guard = router.scope(RouteTarget::Read);
        assert_eq!(router.acquire().unwrap(), "read");
    }
    assert_eq!(router.acquire().unwrap(), "write");
    router.clear();
}

#[test]
fn test_guards_dropped_out_of_order_leave_no_intent() {
    let router = router();

    let outer = router.scope(RouteTarget::Write);
    let inner = router.scope(RouteTarget::Read);
    drop(outer);
    assert_eq!(router.acquire().unwrap(), "read");
    drop(inner);

    assert_eq!(ThreadIntent::current(), None);
    assert_eq!(ThreadIntent::depth(), 0);
    assert_eq!(router.acquire().unwrap(), "read");
}

#[test]
fn test_threads_route_independently() {
    let router = Arc::new(router());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                let target = if i % 2 == 0 {
                    RouteTarget::Write
                } else {
                    RouteTarget::Read
                };
                router.with_intent(target, || {
                    for _ in 0..100 {
                        assert_eq!(router.acquire().unwrap(), target.as_str());
                        thread::yield_now();
                    }
                });
                router.acquire().unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "read");
    }
}
