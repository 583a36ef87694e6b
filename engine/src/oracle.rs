//! The asynchronous decryption oracle.
//!
//! Results are observed for verification only: a handle must already be
//! registered before a decryption referencing it can be requested, and the
//! client key lives strictly behind this boundary. The evaluator never
//! sees it.
//!
//! Two consumption styles are supported: awaiting a request to completion,
//! or submitting for a ticket and polling, where an early poll reports
//! `NotYetAvailable` and the caller retries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use veil_fhe::{ClearUint, ClientKey};
use veil_registry::{Handle, HandleRegistry, RegisteredCiphertext};

use crate::errors::{OracleError, OracleResult};

/// Eventually reveals the plaintext behind a registered handle.
#[async_trait]
pub trait DecryptionOracle: Send + Sync {
    /// Request a decryption and await its completion.
    async fn request_decryption(&self, handle: Handle) -> OracleResult<ClearUint>;
}

/// Receipt for a submitted decryption request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecryptionTicket(u64);

impl DecryptionTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

enum PendingState {
    InFlight,
    Ready(ClearUint),
}

struct DecryptionJob {
    ticket: u64,
    entry: Arc<RegisteredCiphertext>,
    notify: Option<oneshot::Sender<ClearUint>>,
}

/// In-process oracle: a tokio worker drains a queue of decryption jobs.
///
/// Abandoning a request (dropping the future or never polling a ticket) has
/// no effect on the registry or the evaluator.
pub struct LocalDecryptionOracle {
    registry: Arc<HandleRegistry>,
    sender: mpsc::UnboundedSender<DecryptionJob>,
    pending: Arc<Mutex<HashMap<u64, PendingState>>>,
    next_ticket: AtomicU64,
}

impl LocalDecryptionOracle {
    /// Spawn the decryption worker. Must be called inside a tokio runtime.
    pub fn spawn(registry: Arc<HandleRegistry>, client_key: ClientKey) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<DecryptionJob>();
        let pending: Arc<Mutex<HashMap<u64, PendingState>>> = Arc::new(Mutex::new(HashMap::new()));

        let worker_pending = Arc::clone(&pending);
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let clear = job.entry.ciphertext().decrypt(&client_key);
                debug!(handle = %job.entry.handle(), ticket = job.ticket, "decryption complete");
                match job.notify {
                    Some(notify) => {
                        // awaited request: deliver directly, nothing to poll
                        worker_pending.lock().remove(&job.ticket);
                        if notify.send(clear).is_err() {
                            warn!(ticket = job.ticket, "decryption request abandoned");
                        }
                    }
                    None => {
                        worker_pending
                            .lock()
                            .insert(job.ticket, PendingState::Ready(clear));
                    }
                }
            }
        });

        Self {
            registry,
            sender,
            pending,
            next_ticket: AtomicU64::new(0),
        }
    }

    /// Submit a decryption request for later polling.
    ///
    /// Fails with `UnknownHandle` unless the handle is already registered.
    pub fn submit(&self, handle: Handle) -> OracleResult<DecryptionTicket> {
        let (ticket, _) = self.enqueue(handle, false)?;
        Ok(ticket)
    }

    /// Fetch the result of a submitted request.
    ///
    /// `NotYetAvailable` until the worker finishes; the result is consumed by
    /// the first successful fetch.
    pub fn try_fetch(&self, ticket: DecryptionTicket) -> OracleResult<ClearUint> {
        let mut pending = self.pending.lock();
        match pending.remove(&ticket.0) {
            None => Err(OracleError::UnknownTicket(ticket.0)),
            Some(PendingState::InFlight) => {
                pending.insert(ticket.0, PendingState::InFlight);
                Err(OracleError::NotYetAvailable)
            }
            Some(PendingState::Ready(clear)) => Ok(clear),
        }
    }

    fn enqueue(
        &self,
        handle: Handle,
        notify: bool,
    ) -> OracleResult<(DecryptionTicket, Option<oneshot::Receiver<ClearUint>>)> {
        // causal precondition: the producing call must have completed
        let entry = self.registry.resolve(handle)?;
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.pending.lock().insert(ticket, PendingState::InFlight);

        let (tx, rx) = if notify {
            let (tx, rx) = oneshot::channel();
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };

        let sent = self.sender.send(DecryptionJob {
            ticket,
            entry,
            notify: tx,
        });
        if sent.is_err() {
            self.pending.lock().remove(&ticket);
            return Err(OracleError::ServiceStopped);
        }
        Ok((DecryptionTicket(ticket), rx))
    }
}

#[async_trait]
impl DecryptionOracle for LocalDecryptionOracle {
    async fn request_decryption(&self, handle: Handle) -> OracleResult<ClearUint> {
        let (_, rx) = self.enqueue(handle, true)?;
        let Some(rx) = rx else {
            return Err(OracleError::ServiceStopped);
        };
        rx.await.map_err(|_| OracleError::ServiceStopped)
    }
}
