//! "Last request wins" bookkeeping for list refreshes. A caller issues a
//! ticket before starting a query and settles the result with it afterwards;
//! results whose ticket has been superseded are dropped, so a slow, older
//! query can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued request. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Hand back `result` only if no newer request has been issued.
    pub fn settle<T>(&self, ticket: RequestTicket, result: T) -> Option<T> {
        self.is_current(ticket).then_some(result)
    }
}
