//! RNG module - 7-bag random piece generation
//!
//! The bag keeps a FIFO of upcoming kinds. Whenever fewer than the configured
//! minimum lookahead remain, a freshly shuffled permutation of all seven kinds
//! is appended, so every aligned block of seven draws is a permutation and the
//! preview always has at least `min_lookahead` pieces to show.
//!
//! Also provides a simple LCG so that a seed fully determines the sequence.

use std::collections::VecDeque;

use crate::types::{PieceKind, DEFAULT_BAG_LOOKAHEAD};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Randomizer with a guaranteed lookahead depth
#[derive(Debug, Clone)]
pub struct PieceBag {
    queue: VecDeque<PieceKind>,
    min_lookahead: usize,
    rng: SimpleRng,
}

impl PieceBag {
    /// Create a bag that keeps at least `min_lookahead` pieces queued.
    ///
    /// A lookahead of 0 behaves like 1: `next()` always has something to hand out.
    pub fn new(seed: u32, min_lookahead: usize) -> Self {
        let mut bag = Self {
            queue: VecDeque::with_capacity(min_lookahead + PieceKind::ALL.len()),
            min_lookahead: min_lookahead.max(1),
            rng: SimpleRng::new(seed),
        };
        bag.top_up();
        bag
    }

    fn push_permutation(&mut self) {
        let mut kinds = PieceKind::ALL;
        self.rng.shuffle(&mut kinds);
        self.queue.extend(kinds);
    }

    fn top_up(&mut self) {
        while self.queue.len() < self.min_lookahead {
            self.push_permutation();
        }
    }

    /// Dequeue the next kind, then refill to the minimum lookahead.
    pub fn next(&mut self) -> PieceKind {
        if self.queue.is_empty() {
            self.push_permutation();
        }
        // Non-empty after the refill above
        let kind = self.queue.pop_front().unwrap_or(PieceKind::O);
        self.top_up();
        kind
    }

    /// The kind `next()` will return.
    pub fn peek(&self) -> Option<PieceKind> {
        self.queue.front().copied()
    }

    /// Upcoming kinds, nearest first, up to `count`.
    pub fn preview(&self, count: usize) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied().take(count)
    }

    /// Number of kinds currently queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn min_lookahead(&self) -> usize {
        self.min_lookahead
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1, DEFAULT_BAG_LOOKAHEAD)
    }
}
