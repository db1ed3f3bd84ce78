//! FIFO connection pool.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

use crate::PoolError;

/// Default maximum number of concurrently borrowed connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

type Handoff = oneshot::Sender<Result<PooledConnection, PoolError>>;

/// Point-in-time pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Connections currently borrowed.
    pub active: usize,
    /// Callers queued for a slot.
    pub waiting: usize,
    /// Configured capacity.
    pub max: usize,
}

#[derive(Debug, Default)]
struct PoolState {
    active: usize,
    waiters: VecDeque<Handoff>,
    closed: bool,
}

#[derive(Debug)]
struct PoolInner {
    max: usize,
    acquire_timeout: Option<Duration>,
    state: Mutex<PoolState>,
}

impl PoolInner {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Bounded pool of store connections.
///
/// At most `max` connections are borrowed at any time. Callers beyond that
/// are suspended and served strictly in arrival order as slots come back.
/// Cloning the pool yields another handle to the same slots.
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Create a pool with the given capacity (clamped to at least 1).
    pub fn new(max_connections: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                max: max_connections.max(1),
                acquire_timeout: None,
                state: Mutex::new(PoolState::default()),
            }),
        }
    }

    /// Fail `acquire()` with [`PoolError::Exhausted`] after waiting this long.
    ///
    /// Must be called before the pool is shared.
    pub fn with_acquire_timeout(self, timeout: Duration) -> Self {
        let inner = PoolInner {
            max: self.inner.max,
            acquire_timeout: Some(timeout),
            state: Mutex::new(PoolState::default()),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Borrow a connection, waiting for a free slot if the pool is full.
    pub async fn acquire(&self) -> Result<PooledConnection, PoolError> {
        let rx = {
            let mut state = self.inner.lock();
            if state.closed {
                return Err(PoolError::Closed);
            }
            if state.active < self.inner.max {
                state.active += 1;
                drop(state);
                return Ok(PooledConnection::new(Arc::clone(&self.inner)));
            }
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            debug!(
                active = state.active,
                waiting = state.waiters.len(),
                "pool at capacity, queueing caller"
            );
            rx
        };

        let started = Instant::now();
        match self.inner.acquire_timeout {
            None => rx.await.unwrap_or(Err(PoolError::Closed)),
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(handoff) => handoff.unwrap_or(Err(PoolError::Closed)),
                Err(_) => Err(PoolError::Exhausted {
                    waited: started.elapsed(),
                }),
            },
        }
    }

    /// Return a connection to the pool.
    ///
    /// Equivalent to `conn.release()`.
    pub fn release(&self, conn: PooledConnection) {
        conn.release();
    }

    /// Current occupancy. Purely informational.
    pub fn stats(&self) -> PoolStats {
        let state = self.inner.lock();
        PoolStats {
            active: state.active,
            waiting: state.waiters.iter().filter(|tx| !tx.is_closed()).count(),
            max: self.inner.max,
        }
    }

    /// Configured capacity.
    pub fn max_connections(&self) -> usize {
        self.inner.max
    }

    /// Shut the pool down.
    ///
    /// Queued callers are woken with [`PoolError::Closed`] and new
    /// `acquire()` calls fail immediately. Borrowed connections can still be
    /// released.
    pub fn close(&self) {
        let waiters = {
            let mut state = self.inner.lock();
            state.closed = true;
            std::mem::take(&mut state.waiters)
        };
        for tx in waiters {
            let _ = tx.send(Err(PoolError::Closed));
        }
    }

    /// Whether `close()` has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

impl Default for ConnectionPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONNECTIONS)
    }
}

/// A borrowed pool slot.
///
/// The slot goes back to the pool exactly once: on `release()` or, failing
/// that, when the connection is dropped.
#[derive(Debug)]
pub struct PooledConnection {
    id: String,
    created_at: DateTime<Utc>,
    pool: Arc<PoolInner>,
    released: bool,
}

impl PooledConnection {
    fn new(pool: Arc<PoolInner>) -> Self {
        Self {
            id: connection_id(),
            created_at: Utc::now(),
            pool,
            released: false,
        }
    }

    /// Opaque connection token.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the slot was handed out.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Give the slot back, waking the oldest waiter if any.
    pub fn release(mut self) {
        self.give_back();
    }

    /// Forget this handle without touching the pool's counters.
    fn disarm(mut self) {
        self.released = true;
    }

    fn give_back(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let mut state = self.pool.lock();
        while let Some(tx) = state.waiters.pop_front() {
            if tx.is_closed() {
                continue;
            }
            // The slot moves straight to the waiter; `active` is unchanged.
            let next = PooledConnection::new(Arc::clone(&self.pool));
            match tx.send(Ok(next)) {
                Ok(()) => return,
                Err(Ok(unclaimed)) => unclaimed.disarm(),
                Err(Err(_)) => {}
            }
        }
        state.active = state.active.saturating_sub(1);
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        self.give_back();
    }
}

fn connection_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
