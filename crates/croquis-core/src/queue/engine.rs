//! Shuffled traversal over the session's items.
//!
//! The engine owns a permutation of the active items and a cursor into it.
//! Walking past the end starts a new cycle over a fresh shuffle whose head
//! differs from the item just shown.
//!
//! Removing an item while a session runs is not supported here: the host must
//! rebuild the queue with `start` so the cursor never points at a stale id.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use super::shuffle::fisher_yates;
use super::ItemId;
use crate::error::SessionError;

/// Extra shuffles tried when a new cycle would open with the item that closed
/// the previous one.
pub const MAX_RESHUFFLE_ATTEMPTS: u32 = 3;

/// Outcome of [`QueueEngine::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Nothing to advance; the queue was never started.
    NotStarted,
    /// Moved to the next position within the current order.
    Stepped,
    /// The order was exhausted and a new cycle began at position 0.
    NewCycle { reshuffled: bool },
}

#[derive(Debug, Clone)]
pub struct QueueEngine<R> {
    rng: R,
    order: Vec<ItemId>,
    position: Option<usize>,
    cycle_count: u32,
    avoid_repeat: bool,
}

impl<R: Rng> QueueEngine<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            order: Vec::new(),
            position: None,
            cycle_count: 0,
            avoid_repeat: true,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn order(&self) -> &[ItemId] {
        &self.order
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_started(&self) -> bool {
        self.position.is_some()
    }

    pub fn avoid_repeat(&self) -> bool {
        self.avoid_repeat
    }

    pub fn current_item(&self) -> Option<&ItemId> {
        self.position.and_then(|p| self.order.get(p))
    }

    /// Items after the current one in this cycle, nearest first.
    pub fn upcoming(&self, limit: usize) -> &[ItemId] {
        match self.position {
            Some(p) => {
                let rest = &self.order[p + 1..];
                &rest[..rest.len().min(limit)]
            }
            None => &[],
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// When off, exhausting the order wraps to its start without reshuffling.
    pub fn set_avoid_repeat(&mut self, avoid_repeat: bool) {
        self.avoid_repeat = avoid_repeat;
    }

    /// Build a fresh shuffle of `items` and point at its first entry.
    ///
    /// Duplicate ids are collapsed, keeping the first occurrence.
    pub fn start<I>(&mut self, items: I) -> Result<(), SessionError>
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        let mut seen = HashSet::new();
        let mut order: Vec<ItemId> = items
            .into_iter()
            .map(Into::into)
            .filter(|id: &ItemId| seen.insert(id.clone()))
            .collect();
        if order.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        fisher_yates(&mut order, &mut self.rng);
        debug!(items = order.len(), "queue started");
        self.order = order;
        self.position = Some(0);
        self.cycle_count = 0;
        Ok(())
    }

    pub fn advance(&mut self) -> Advance {
        let Some(position) = self.position else {
            return Advance::NotStarted;
        };

        if position + 1 < self.order.len() {
            self.position = Some(position + 1);
            return Advance::Stepped;
        }

        let reshuffled = self.avoid_repeat;
        if reshuffled {
            self.reshuffle();
        }
        self.position = Some(0);
        self.cycle_count += 1;
        debug!(cycle = self.cycle_count, reshuffled, "queue exhausted, new cycle");
        Advance::NewCycle { reshuffled }
    }

    /// Step back one position, wrapping from the first item to the last.
    pub fn retreat(&mut self) {
        if let Some(position) = self.position {
            let len = self.order.len();
            self.position = Some((position + len - 1) % len);
        }
    }

    pub fn stop(&mut self) {
        self.order.clear();
        self.position = None;
        self.cycle_count = 0;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reshuffle(&mut self) {
        let Some(last) = self.order.last().cloned() else {
            return;
        };

        fisher_yates(&mut self.order, &mut self.rng);
        if self.order.len() < 2 {
            return;
        }

        let mut attempts = 0;
        while self.order[0] == last && attempts < MAX_RESHUFFLE_ATTEMPTS {
            fisher_yates(&mut self.order, &mut self.rng);
            attempts += 1;
        }
        if self.order[0] == last {
            // Retries exhausted: move the repeated item out of the head slot.
            let swap_with = self.rng.gen_range(1..self.order.len());
            self.order.swap(0, swap_with);
        }
    }
}
