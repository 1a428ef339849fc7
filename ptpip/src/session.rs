//! Session management for PTP/IP
//!
//! A session tracks:
//! - Connection number (assigned by the responder in the init ack)
//! - Session id (chosen by the initiator in `OpenSession`)
//! - Transaction counter (one id per operation)

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No init handshake yet
    Disconnected,

    /// Command channel initialized, no PTP session open
    Initialized,

    /// `OpenSession` accepted
    Opened,
}

/// Session manager
///
/// Thread-safe and cheap to clone (Arc internally), so the event side can
/// read what the command side negotiated.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    connection_number: AtomicU32,

    /// Session id sent with OpenSession (0 when not open)
    session_id: AtomicU32,

    transaction_counter: AtomicU32,

    state: parking_lot::RwLock<SessionState>,
}

impl Session {
    /// Transaction id of the first operation after initialization
    pub const INITIAL_TRANSACTION_ID: u32 = 0;

    /// Create a new disconnected session
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                connection_number: AtomicU32::new(0),
                session_id: AtomicU32::new(0),
                transaction_counter: AtomicU32::new(Self::INITIAL_TRANSACTION_ID),
                state: parking_lot::RwLock::new(SessionState::Disconnected),
            }),
        }
    }

    pub fn connection_number(&self) -> u32 {
        self.inner.connection_number.load(Ordering::Acquire)
    }

    pub fn session_id(&self) -> u32 {
        self.inner.session_id.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    /// Check if the init handshake has completed
    pub fn is_initialized(&self) -> bool {
        !matches!(self.state(), SessionState::Disconnected)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state(), SessionState::Opened)
    }

    /// Record a completed init handshake
    pub fn initialize(&self, connection_number: u32) -> Result<()> {
        let mut state = self.inner.state.write();

        if *state != SessionState::Disconnected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot initialize from state: {:?}",
                *state
            )));
        }

        self.inner
            .connection_number
            .store(connection_number, Ordering::Release);
        self.inner
            .transaction_counter
            .store(Self::INITIAL_TRANSACTION_ID, Ordering::Release);
        *state = SessionState::Initialized;

        debug!("Session initialized (connection {})", connection_number);
        Ok(())
    }

    /// Mark the PTP session as open
    pub fn open(&self, session_id: u32) -> Result<()> {
        let mut state = self.inner.state.write();

        if *state != SessionState::Initialized {
            return Err(Error::InvalidSessionState(format!(
                "Cannot open session from state: {:?}",
                *state
            )));
        }

        self.inner.session_id.store(session_id, Ordering::Release);
        *state = SessionState::Opened;

        debug!("Session {} opened", session_id);
        Ok(())
    }

    /// Mark the PTP session as closed, keeping the channel initialized
    pub fn close_session(&self) -> Result<()> {
        let mut state = self.inner.state.write();

        if *state != SessionState::Opened {
            return Err(Error::InvalidSessionState(format!(
                "Cannot close session from state: {:?}",
                *state
            )));
        }

        self.inner.session_id.store(0, Ordering::Release);
        *state = SessionState::Initialized;
        Ok(())
    }

    /// Forget everything
    pub fn close(&self) {
        self.inner.connection_number.store(0, Ordering::Release);
        self.inner.session_id.store(0, Ordering::Release);
        self.inner
            .transaction_counter
            .store(Self::INITIAL_TRANSACTION_ID, Ordering::Release);
        *self.inner.state.write() = SessionState::Disconnected;
    }

    /// Get next transaction id
    ///
    /// Starts at 0 and wraps to 0 after `u32::MAX`.
    pub fn next_transaction_id(&self) -> u32 {
        self.inner.transaction_counter.fetch_add(1, Ordering::AcqRel)
    }

    #[cfg(test)]
    pub(crate) fn set_transaction_counter(&self, value: u32) {
        self.inner
            .transaction_counter
            .store(value, Ordering::Release);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
