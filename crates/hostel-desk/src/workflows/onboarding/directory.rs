use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::domain::IdentityRecord;

/// Role filter applied to directory searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryRole {
    Guest,
    Resident,
    Staff,
}

impl DirectoryRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::Resident => "Resident",
            Self::Staff => "Staff",
        }
    }
}

/// Free-text lookup over previously registered people.
pub trait GuestDirectory: Send + Sync {
    fn search(&self, query: &str, role: DirectoryRole)
        -> Result<Vec<IdentityRecord>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// A coalesced query released by the debouncer. The generation orders fired
/// queries within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub query: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct PendingQuery {
    query: String,
    deadline: Instant,
}

/// Cancellable-timer model for search-as-you-type: every keystroke restarts
/// the delay window, and at most one query fires per pause. The caller owns
/// the clock; nothing here reads system time.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    generation: u64,
    pending: Option<PendingQuery>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// Record a keystroke, restarting the delay window.
    pub fn input(&mut self, query: &str, now: Instant) {
        self.pending = Some(PendingQuery {
            query: query.to_string(),
            deadline: now + self.delay,
        });
    }

    /// Release the pending query once its window has elapsed.
    pub fn due(&mut self, now: Instant) -> Option<QueryTicket> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                let pending = self.pending.take()?;
                self.generation += 1;
                Some(QueryTicket {
                    query: pending.query,
                    generation: self.generation,
                })
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Debouncer plus the current candidate list. Responses apply last-write-wins;
/// in-flight lookups are never cancelled.
#[derive(Debug, Clone)]
pub struct SearchSession {
    debouncer: SearchDebouncer,
    results: Vec<IdentityRecord>,
}

impl SearchSession {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: SearchDebouncer::new(delay),
            results: Vec::new(),
        }
    }

    pub fn input(&mut self, query: &str, now: Instant) {
        self.debouncer.input(query, now);
    }

    pub fn due(&mut self, now: Instant) -> Option<QueryTicket> {
        self.debouncer.due(now)
    }

    pub fn apply(&mut self, results: Vec<IdentityRecord>) {
        self.results = results;
    }

    pub fn results(&self) -> &[IdentityRecord] {
        &self.results
    }

    /// Drop the pending timer and any displayed candidates.
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.results.clear();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

/// Run a fired query against the directory, degrading lookup failures to an
/// empty candidate list.
pub fn run_search<D>(directory: &D, ticket: &QueryTicket, role: DirectoryRole) -> Vec<IdentityRecord>
where
    D: GuestDirectory + ?Sized,
{
    directory
        .search(&ticket.query, role)
        .unwrap_or_default()
}
