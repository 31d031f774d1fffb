//! Bounded connection accounting shared by every in-flight request of one client.

use crate::{Error, Result};
use log::debug;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Point-in-time statistics of a [`ConnectionPool`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Max connections the pool will hand out at once.
    pub max: usize,
    /// Opened connections that are idle and ready for reuse.
    pub available: usize,
    /// Callers blocked waiting for a connection.
    pub pending: usize,
    /// Connections currently in use.
    pub leased: usize,
}

impl Display for PoolStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PoolStats{{Total={}, Available={}, Pending={}, Leased={}}}",
            self.max, self.available, self.pending, self.leased
        )
    }
}

#[derive(Debug, Default)]
struct PoolState {
    leased: usize,
    pending: usize,
    opened: usize,
    routes: HashMap<String, usize>,
}

#[derive(Debug)]
struct PoolInner {
    max_total: usize,
    max_per_route: usize,
    acquire_timeout: Option<Duration>,

    state: Mutex<PoolState>,
    released: Condvar,
}

/// ConnectionPool bounds how many requests may be on the wire at once.
///
/// A route is `scheme://host:port`. Callers block in [`ConnectionPool::acquire`]
/// while either the pool or their route is full, and are counted as pending
/// meanwhile. The returned [`Lease`] gives the slot back when dropped.
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Create a new pool. Both limits are raised to at least one, and the
    /// per-route limit never exceeds the total.
    ///
    /// `acquire_timeout` bounds how long a caller may wait for a slot.
    pub fn new(max_total: usize, max_per_route: usize, acquire_timeout: Option<Duration>) -> Self {
        let max_total = max_total.max(1);
        Self {
            inner: Arc::new(PoolInner {
                max_total,
                max_per_route: max_per_route.clamp(1, max_total),
                acquire_timeout,
                state: Mutex::new(PoolState::default()),
                released: Condvar::new(),
            }),
        }
    }

    /// Max connections for the whole pool.
    pub fn max_total(&self) -> usize {
        self.inner.max_total
    }

    /// Max connections for a single route.
    pub fn max_per_route(&self) -> usize {
        self.inner.max_per_route
    }

    /// Lease a connection slot for `route`, blocking until one is free.
    ///
    /// Fails with a transport error once the acquire timeout elapses.
    pub fn acquire(&self, route: &str) -> Result<Lease> {
        let inner = &self.inner;
        let deadline = inner.acquire_timeout.map(|t| Instant::now() + t);

        let mut state = inner.state.lock().expect("lock poisoned");
        state.pending += 1;
        loop {
            let in_route = state.routes.get(route).copied().unwrap_or_default();
            if state.leased < inner.max_total && in_route < inner.max_per_route {
                break;
            }

            state = match deadline {
                None => inner.released.wait(state).expect("lock poisoned"),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        state.pending -= 1;
                        return Err(Error::transport(format!(
                            "timed out after {:?} waiting for a connection to {route}",
                            inner.acquire_timeout.unwrap_or_default()
                        )));
                    }
                    inner
                        .released
                        .wait_timeout(state, deadline - now)
                        .expect("lock poisoned")
                        .0
                }
            };
        }

        state.pending -= 1;
        state.leased += 1;
        state.opened = state.opened.max(state.leased);
        *state.routes.entry(route.to_string()).or_default() += 1;
        debug!("leased connection to {route}, {} in use", state.leased);

        Ok(Lease {
            pool: self.inner.clone(),
            route: route.to_string(),
        })
    }

    /// Snapshot the pool counters.
    pub fn stats(&self) -> PoolStats {
        let state = self.inner.state.lock().expect("lock poisoned");
        PoolStats {
            max: self.inner.max_total,
            available: state.opened - state.leased,
            pending: state.pending,
            leased: state.leased,
        }
    }
}

/// A leased connection slot, released on drop.
#[derive(Debug)]
pub struct Lease {
    pool: Arc<PoolInner>,
    route: String,
}

impl Lease {
    /// The route this lease was taken for.
    pub fn route(&self) -> &str {
        &self.route
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        let mut state = self.pool.state.lock().expect("lock poisoned");
        state.leased -= 1;
        if let Some(n) = state.routes.get_mut(&self.route) {
            *n -= 1;
            if *n == 0 {
                state.routes.remove(&self.route);
            }
        }
        drop(state);

        self.pool.released.notify_all();
    }
}
