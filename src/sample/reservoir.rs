//! Reservoir sampling implementation (Algorithm R).
//!
//! Provides a uniform random sample of fixed size `k` over a stream of unknown
//! length with a single pass and `O(k)` memory.

use crate::draw::RandomDraw;

/// Reservoir sampler using Algorithm R.
///
/// After `n >= k` items have been considered, every item seen so far is in the
/// reservoir with probability `k / n`, and every size-`k` subset of them is
/// equally likely. Before that, slot `i` holds the `i`-th item.
#[derive(Debug)]
pub struct Reservoir<T, D> {
    /// Maximum capacity of the reservoir
    capacity: usize,
    /// Total count of items seen
    count: usize,
    /// Current items in the reservoir
    items: Vec<T>,
    draw: D,
}

impl<T, D: RandomDraw> Reservoir<T, D> {
    /// Create a new reservoir with the given capacity
    pub fn new(capacity: usize, draw: D) -> Self {
        Self {
            capacity,
            count: 0,
            items: Vec::with_capacity(capacity),
            draw,
        }
    }

    /// Consider an item for inclusion in the reservoir.
    ///
    /// Returns the slot the item was stored in, if it was kept.
    pub fn consider(&mut self, item: T) -> Option<usize> {
        self.count += 1;

        if self.capacity == 0 {
            return None;
        }

        if self.count <= self.capacity {
            self.items.push(item);
            return Some(self.count - 1);
        }

        let accept = self.capacity as f64 / self.count as f64;
        if self.draw.uniform01() < accept {
            let slot = self.draw.uniform_int(self.capacity);
            self.items[slot] = item;
            Some(slot)
        } else {
            None
        }
    }

    /// Get the number of items seen so far
    pub fn total_seen(&self) -> usize {
        self.count
    }

    /// Get the current size of the reservoir
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the reservoir is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the capacity of the reservoir
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume the reservoir and return the sampled items in slot order.
    ///
    /// Holds `min(n, k)` items: a stream shorter than the capacity yields
    /// only what it contained.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Get a reference to the current items
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

/// Draw a uniform sample of `k` items from `items` in one pass.
pub fn reservoir_sample<T, I, D>(items: I, k: usize, draw: D) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    D: RandomDraw,
{
    let mut reservoir = Reservoir::new(k, draw);
    for item in items {
        reservoir.consider(item);
    }
    reservoir.into_items()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::RngDraw;

    #[test]
    fn test_fills_in_order_before_capacity() {
        let mut reservoir = Reservoir::new(3, RngDraw::seeded(1));
        assert_eq!(reservoir.consider("a"), Some(0));
        assert_eq!(reservoir.consider("b"), Some(1));
        assert_eq!(reservoir.items(), &["a", "b"]);
        assert_eq!(reservoir.total_seen(), 2);
        assert_eq!(reservoir.capacity(), 3);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let sample = reservoir_sample(0..100, 0, RngDraw::seeded(1));
        assert!(sample.is_empty());
    }

    #[test]
    fn test_exact_size_when_stream_longer() {
        let sample = reservoir_sample(0..1000, 10, RngDraw::seeded(3));
        assert_eq!(sample.len(), 10);
        let mut sorted = sample.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 10, "no item may appear twice");
    }
}
