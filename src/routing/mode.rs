//! Process-wide routing mode.
//!
//! Written once at startup (see [`ModeRegistry::init_from_config`]) and read
//! everywhere afterwards. Writing it while requests are in flight is not
//! supported: components read the mode once and keep their answer.

use super::RoutingMode;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{info, warn};

const MODE_SYNC: u8 = 0;
const MODE_ASYNC: u8 = 1;

static GLOBAL: ModeRegistry = ModeRegistry::new();

#[derive(Debug)]
pub struct ModeRegistry {
    mode: AtomicU8,
}

impl ModeRegistry {
    /// Create a registry in `Sync` mode.
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(MODE_SYNC),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static ModeRegistry {
        &GLOBAL
    }

    /// Parse the configured mode string, store it, and return it.
    pub fn init_from_config(&self, configured: &str) -> RoutingMode {
        let mode = RoutingMode::parse_lenient(configured);
        let normalized = configured.trim();
        if !normalized.eq_ignore_ascii_case("sync") && !normalized.eq_ignore_ascii_case("async") {
            warn!(configured = %configured, mode = %mode, "Unrecognized database mode, using default");
        }
        self.set_mode(mode);
        info!(mode = %mode, "Database mode initialized");
        mode
    }

    /// Repeated writes are accepted; last write wins.
    pub fn set_mode(&self, mode: RoutingMode) {
        let raw = match mode {
            RoutingMode::Sync => MODE_SYNC,
            RoutingMode::Async => MODE_ASYNC,
        };
        self.mode.store(raw, Ordering::Release);
    }

    pub fn mode(&self) -> RoutingMode {
        match self.mode.load(Ordering::Acquire) {
            MODE_ASYNC => RoutingMode::Async,
            _ => RoutingMode::Sync,
        }
    }

    pub fn is_async(&self) -> bool {
        self.mode() == RoutingMode::Async
    }

    pub fn is_sync(&self) -> bool {
        self.mode() == RoutingMode::Sync
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_registry_is_sync() {
        let registry = ModeRegistry::new();
        assert_eq!(registry.mode(), RoutingMode::Sync);
        assert!(registry.is_sync());
        assert!(!registry.is_async());
    }

    #[test]
    fn test_set_and_get() {
        let registry = ModeRegistry::new();
        registry.set_mode(RoutingMode::Async);
        assert!(registry.is_async());
        registry.set_mode(RoutingMode::Async);
        assert!(registry.is_async());
        registry.set_mode(RoutingMode::Sync);
        assert!(registry.is_sync());
    }

    #[test]
    fn test_init_from_config() {
        let registry = ModeRegistry::new();
        assert_eq!(registry.init_from_config("ASYNC"), RoutingMode::Async);
        assert!(registry.is_async());
        assert_eq!(registry.init_from_config("whatever"), RoutingMode::Sync);
        assert!(registry.is_sync());
    }

    #[test]
    fn test_value_written_at_startup_visible_to_other_threads() {
        let registry = Arc::new(ModeRegistry::new());
        registry.set_mode(RoutingMode::Async);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.mode())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), RoutingMode::Async);
        }
    }
}
