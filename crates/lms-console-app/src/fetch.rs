// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<Q> {
    pub request_id: u64,
    pub query: Q,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFetch<Q> {
    query: Q,
    due_at: Instant,
}

/// Coalesces bursts of query changes into a single request per quiet period.
///
/// Each issued request gets a fresh id. Only the most recent id is accepted
/// on completion; rescheduling, firing again, or cancelling retires it, so a
/// late response from a superseded query can never be applied.
#[derive(Debug, Clone)]
pub struct FetchController<Q> {
    quiet_period: Duration,
    pending: Option<PendingFetch<Q>>,
    in_flight: Option<u64>,
    last_request_id: u64,
}

impl<Q: Clone> FetchController<Q> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            in_flight: None,
            last_request_id: 0,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn schedule(&mut self, query: Q, now: Instant) {
        self.in_flight = None;
        self.pending = Some(PendingFetch {
            query,
            due_at: now + self.quiet_period,
        });
    }

    /// Issues the pending request once its quiet period has elapsed. Without
    /// a credential the pending request is dropped instead.
    pub fn poll(&mut self, now: Instant, has_token: bool) -> Option<FetchTicket<Q>> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.due_at <= now);
        if !due {
            return None;
        }

        let pending = self.pending.take()?;
        if !has_token {
            return None;
        }
        Some(self.issue(pending.query))
    }

    pub fn fire_now(&mut self, query: Q, has_token: bool) -> Option<FetchTicket<Q>> {
        self.pending = None;
        if !has_token {
            self.in_flight = None;
            return None;
        }
        Some(self.issue(query))
    }

    /// Claims a completion. Returns `false` for superseded or unknown ids.
    pub fn accept(&mut self, request_id: u64) -> bool {
        if self.in_flight == Some(request_id) {
            self.in_flight = None;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.in_flight = None;
    }

    /// Drops the pending request but keeps the in-flight one claimable.
    pub fn drop_pending(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    fn issue(&mut self, query: Q) -> FetchTicket<Q> {
        self.last_request_id = self.last_request_id.wrapping_add(1);
        self.in_flight = Some(self.last_request_id);
        FetchTicket {
            request_id: self.last_request_id,
            query,
        }
    }
}

impl<Q: Clone> Default for FetchController<Q> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}
