use crate::error::Result;
use dashmap::DashMap;
use manager::ClientManager;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};

pub mod config;
pub mod credentials;
pub mod manager;

static NEXT_WORKER: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT_WORKER: u64 = NEXT_WORKER.fetch_add(1, Ordering::Relaxed);
}

/// Identity of the execution context that owns a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(u64);

impl WorkerId {
    /// The identity of the OS thread running the caller. Capture it at the
    /// request boundary and pass it down explicitly.
    pub fn current() -> Self {
        Self(CURRENT_WORKER.with(|id| *id))
    }

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// One lazily created client per worker, kept for the life of the process.
///
/// Lookups go through the sharded map without a global lock. On a miss the
/// client is built with no lock held and published through the `entry` API,
/// so two racing first uses by the same worker keep the first insert.
pub struct ClientPool<M: ClientManager> {
    manager: M,
    clients: DashMap<WorkerId, Arc<M::Client>>,
    created: AtomicUsize,
}

impl<M: ClientManager> ClientPool<M> {
    pub fn new(manager: M) -> Self {
        Self {
            manager,
            clients: DashMap::new(),
            created: AtomicUsize::new(0),
        }
    }

    #[instrument(skip(self, worker), fields(worker = worker.get()))]
    pub async fn acquire(&self, worker: WorkerId) -> Result<Arc<M::Client>> {
        let cached = self.clients.get(&worker).map(|c| Arc::clone(c.value()));
        if let Some(client) = cached {
            return Ok(client);
        }

        let client = Arc::new(self.manager.create().await?);
        self.created.fetch_add(1, Ordering::Relaxed);
        debug!("created warehouse client for worker");

        let client = Arc::clone(self.clients.entry(worker).or_insert(client).value());
        Ok(client)
    }

    /// Number of workers holding a client
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Number of clients the manager has built, including any that lost a
    /// same-worker insert race
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }
}
