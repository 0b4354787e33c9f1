//! Shutdown hooks linking the client's disconnect to its host application

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// The application that owns a maintenance client.
///
/// `close` is awaited when the client is about to disconnect, so the host
/// can finish its own shutdown while the pool is still open.
#[async_trait]
pub trait HostApplication: Send + Sync {
    async fn close(&self);
}

/// Hosts waiting for the disconnect notification
#[derive(Default)]
pub struct ShutdownHooks {
    hosts: Mutex<Vec<Arc<dyn HostApplication>>>,
}

impl ShutdownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, host: Arc<dyn HostApplication>) {
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        hosts.push(host);
    }

    pub fn len(&self) -> usize {
        self.hosts.lock().map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every registered host in registration order.
    ///
    /// Hooks are drained before any of them runs, so each host is closed at
    /// most once. Returns how many hosts were closed.
    pub async fn fire(&self) -> usize {
        let hosts: Vec<Arc<dyn HostApplication>> = {
            let mut guard = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *guard)
        };

        for host in &hosts {
            host.close().await;
        }
        hosts.len()
    }
}

/// Host used by the CLI: records that shutdown was requested
#[derive(Debug, Default)]
pub struct ProcessHost {
    closes: AtomicUsize,
}

impl ProcessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostApplication for ProcessHost {
    async fn close(&self) {
        let previous = self.closes.fetch_add(1, Ordering::SeqCst);
        info!(previous_closes = previous, "Host application closing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fire_closes_each_host_once() {
        let hooks = ShutdownHooks::new();
        let first = Arc::new(ProcessHost::new());
        let second = Arc::new(ProcessHost::new());
        hooks.register(first.clone());
        hooks.register(second.clone());
        assert_eq!(hooks.len(), 2);

        assert_eq!(hooks.fire().await, 2);
        assert_eq!(hooks.fire().await, 0);

        assert_eq!(first.close_count(), 1);
        assert_eq!(second.close_count(), 1);
        assert!(hooks.is_empty());
    }
}
