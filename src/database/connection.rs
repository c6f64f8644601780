//! Connection manager
//!
//! Owns the single current session plus a queue of stale sessions that were
//! retired by the reconnect path and still need closing. The manager is an
//! ordinary value shared through `Arc`; all state sits behind one async
//! `RwLock` so "current" is always consistent across tasks.

use crate::database::adapter::{DatabaseDriver, DriverSession};
use crate::database::adapters::MySqlDriver;
use crate::database::config::ConnectionConfig;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cheap, clonable reference to one open session
///
/// Two handles are equal when they refer to the same session.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: u64,
    session: Arc<dyn DriverSession>,
}

impl ConnectionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn session(&self) -> &Arc<dyn DriverSession> {
        &self.session
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[derive(Default)]
struct ManagerState {
    current: Option<ConnectionHandle>,
    stale: VecDeque<ConnectionHandle>,
    config: Option<ConnectionConfig>,
    /// Set once the first session has been opened
    opened: bool,
}

pub struct ConnectionManager {
    driver: Arc<dyn DatabaseDriver>,
    state: RwLock<ManagerState>,
    next_id: AtomicU64,
}

impl ConnectionManager {
    pub fn new(driver: Arc<dyn DatabaseDriver>) -> Self {
        Self {
            driver,
            state: RwLock::new(ManagerState::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Manager backed by the MySQL driver
    pub fn mysql() -> Self {
        Self::new(Arc::new(MySqlDriver::new()))
    }

    pub fn driver_name(&self) -> &str {
        self.driver.name()
    }

    async fn open(&self, config: &ConnectionConfig) -> Result<ConnectionHandle> {
        let session = self.driver.connect(config).await?;
        Ok(ConnectionHandle {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            session,
        })
    }

    /// Open a session and make it current
    ///
    /// A previous current handle is queued as stale rather than closed, since
    /// other tasks may still hold it.
    pub async fn connect(&self, config: ConnectionConfig) -> Result<ConnectionHandle> {
        config.validate()?;

        let handle = self.open(&config).await?;
        log::info!(
            "Connected to {} ({}) as handle {}",
            self.driver.name(),
            config.to_url(),
            handle.id
        );

        let mut state = self.state.write().await;
        if let Some(previous) = state.current.replace(handle.clone()) {
            state.stale.push_back(previous);
        }
        state.config = Some(config);
        state.opened = true;

        Ok(handle)
    }

    /// Close a handle's session
    ///
    /// Closing an already-closed handle is fine. Fails only when this manager
    /// has never opened anything.
    pub async fn disconnect(&self, handle: &ConnectionHandle) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if !state.opened {
                return Err(Error::not_connected("No connection has been opened"));
            }
            if state.current.as_ref() == Some(handle) {
                state.current = None;
            }
            state.stale.retain(|h| h != handle);
        }

        handle.session.close().await?;
        log::debug!("Disconnected handle {}", handle.id);
        Ok(())
    }

    /// The current handle
    pub async fn active_connection(&self) -> Result<ConnectionHandle> {
        self.state
            .read()
            .await
            .current
            .clone()
            .ok_or_else(|| Error::not_connected("No active database connection"))
    }

    /// Retire `stale` and open a fresh session with the remembered config
    pub async fn reconnect(&self, stale: &ConnectionHandle) -> Result<ConnectionHandle> {
        let config = self
            .state
            .read()
            .await
            .config
            .clone()
            .ok_or_else(|| Error::not_connected("Cannot reconnect before the first connect"))?;

        log::warn!(
            "Reconnecting to {} after losing handle {}",
            self.driver.name(),
            stale.id
        );
        let handle = self.open(&config).await?;

        let mut state = self.state.write().await;
        if !state.stale.contains(stale) {
            state.stale.push_back(stale.clone());
        }
        // Another task may already have replaced the current handle
        if let Some(previous) = state.current.replace(handle.clone()) {
            if &previous != stale && !state.stale.contains(&previous) {
                state.stale.push_back(previous);
            }
        }

        Ok(handle)
    }

    /// Close a handle the caller has given up on and drop it from the queue
    pub async fn retire(&self, handle: &ConnectionHandle) -> Result<()> {
        self.state.write().await.stale.retain(|h| h != handle);
        handle.session.close().await?;
        log::debug!("Retired handle {}", handle.id);
        Ok(())
    }

    /// Close queued stale handles nobody else holds, returning how many
    ///
    /// Handles still cloned elsewhere stay queued until their last holder
    /// lets go.
    pub async fn close_stale(&self) -> usize {
        let idle = {
            let mut state = self.state.write().await;
            let (idle, held): (Vec<_>, Vec<_>) = state
                .stale
                .drain(..)
                .partition(|h| Arc::strong_count(&h.session) == 1);
            state.stale = held.into();
            idle
        };

        close_handles(&idle).await;
        if !idle.is_empty() {
            log::debug!("Closed {} stale connection(s)", idle.len());
        }
        idle.len()
    }

    /// Close the current handle and everything stale
    pub async fn disconnect_all(&self) -> Result<()> {
        let (current, stale) = {
            let mut state = self.state.write().await;
            let stale: Vec<_> = state.stale.drain(..).collect();
            (state.current.take(), stale)
        };

        close_handles(&stale).await;
        if let Some(handle) = current {
            handle.session.close().await?;
        }
        Ok(())
    }

    pub async fn stale_count(&self) -> usize {
        self.state.read().await.stale.len()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.current.is_some()
    }
}

async fn close_handles(handles: &[ConnectionHandle]) {
    for handle in handles {
        if let Err(e) = handle.session.close().await {
            log::debug!("Failed to close stale handle {}: {}", handle.id, e);
        }
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("driver", &self.driver.name())
            .finish()
    }
}
