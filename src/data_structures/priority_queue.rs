use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Debug;

/// A min-first wrapper around BinaryHeap for label-setting searches.
///
/// Entries are ordered by `(priority, item)`, so among equal priorities
/// the smallest item is popped first.
#[derive(Debug)]
pub struct MinQueue<V, P>
where
    V: Ord + Clone + Debug,
    P: Ord + Clone + Debug,
{
    /// The underlying binary heap
    heap: BinaryHeap<Reverse<(P, V)>>,
}

impl<V, P> MinQueue<V, P>
where
    V: Ord + Clone + Debug,
    P: Ord + Clone + Debug,
{
    /// Creates a new empty priority queue
    pub fn new() -> Self {
        MinQueue {
            heap: BinaryHeap::new(),
        }
    }

    /// Returns true if the priority queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the number of entries, stale ones included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Pushes an item with the given priority
    pub fn push(&mut self, item: V, priority: P) {
        self.heap.push(Reverse((priority, item)));
    }

    /// Removes the entry with the lowest priority
    pub fn pop(&mut self) -> Option<(V, P)> {
        self.heap.pop().map(|Reverse((priority, item))| (item, priority))
    }

    /// Returns the entry with the lowest priority without removing it
    pub fn peek(&self) -> Option<(&V, &P)> {
        self.heap.peek().map(|Reverse((priority, item))| (item, priority))
    }
}

impl<V, P> Default for MinQueue<V, P>
where
    V: Ord + Clone + Debug,
    P: Ord + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
