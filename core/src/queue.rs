//! Per-product FIFO queues of agent slots.
//!
//! RULE: an agent occupies a queue at most once at any instant.
//!
//! Removal from the middle is O(1): each agent slot carries a generation
//! number, the deque stores `(slot, generation)` pairs, and `remove` simply
//! invalidates the live generation. Stale pairs are skipped when they reach
//! the head.

use crate::{capacity::CapacityRegistry, types::Product};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct ProductQueue {
    product: Product,
    entries: VecDeque<(usize, u64)>,
    /// Live generation per agent slot, `None` when the agent is not queued.
    live: Vec<Option<u64>>,
    next_generation: u64,
    len: usize,
}

impl ProductQueue {
    pub fn new(product: Product, agent_slots: usize) -> Self {
        Self {
            product,
            entries: VecDeque::with_capacity(agent_slots),
            live: vec![None; agent_slots],
            next_generation: 0,
            len: 0,
        }
    }

    /// Seed the queue in registry order (ascending agent_id).
    ///
    /// An agent is admitted when its share of this product is positive, it
    /// has overall capacity left, and the share rounded to at least one slot.
    pub fn initial(product: Product, registry: &CapacityRegistry) -> Self {
        let mut queue = Self::new(product, registry.len());
        for (slot, counters) in registry.iter() {
            if registry.share(slot, product) > 0.0 && !counters.is_exhausted() && counters.remaining(product) > 0 {
                queue.push_back(slot);
            }
        }
        queue
    }

    pub fn product(&self) -> Product {
        self.product
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.live.get(slot).is_some_and(|g| g.is_some())
    }

    /// Append `slot` to the tail. No-op if it is already queued.
    pub fn push_back(&mut self, slot: usize) -> bool {
        if slot >= self.live.len() {
            self.live.resize(slot + 1, None);
        }
        if self.live[slot].is_some() {
            return false;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.live[slot] = Some(generation);
        self.entries.push_back((slot, generation));
        self.len += 1;
        true
    }

    /// Pop the agent at the head, skipping removed entries.
    pub fn pop_front(&mut self) -> Option<usize> {
        while let Some((slot, generation)) = self.entries.pop_front() {
            if self.live[slot] == Some(generation) {
                self.live[slot] = None;
                self.len -= 1;
                return Some(slot);
            }
        }
        None
    }

    /// Drop `slot` wherever it sits. Returns whether it was queued.
    pub fn remove(&mut self, slot: usize) -> bool {
        match self.live.get_mut(slot) {
            Some(entry) if entry.is_some() => {
                *entry = None;
                self.len -= 1;
                true
            }
            _ => false,
        }
    }

    /// Live agent slots, head first.
    pub fn snapshot(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|(slot, generation)| self.live[*slot] == Some(*generation))
            .map(|(slot, _)| *slot)
            .collect()
    }
}

/// The two product queues of one run.
#[derive(Debug, Clone)]
pub struct QueuePair {
    pub a: ProductQueue,
    pub b: ProductQueue,
}

impl QueuePair {
    pub fn initial(registry: &CapacityRegistry) -> Self {
        Self {
            a: ProductQueue::initial(Product::A, registry),
            b: ProductQueue::initial(Product::B, registry),
        }
    }

    pub fn get(&self, product: Product) -> &ProductQueue {
        match product {
            Product::A => &self.a,
            Product::B => &self.b,
        }
    }

    pub fn get_mut(&mut self, product: Product) -> &mut ProductQueue {
        match product {
            Product::A => &mut self.a,
            Product::B => &mut self.b,
        }
    }

    /// Remove `slot` from both queues.
    pub fn remove_everywhere(&mut self, slot: usize) {
        self.a.remove(slot);
        self.b.remove(slot);
    }
}
