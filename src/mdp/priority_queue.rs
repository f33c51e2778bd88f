use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

struct QueueItem<T> {
    priority: f64,
    order: u64,
    item: T,
}

// BinaryHeap is a max-heap; invert so the lowest priority, then the oldest push, surfaces first.
impl<T> Ord for QueueItem<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl<T> PartialOrd for QueueItem<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for QueueItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for QueueItem<T> {}

/// Min-priority queue holding each item at most once.
///
/// Re-prioritised items leave stale heap entries behind; `pop` skips them.
pub struct PriorityQueue<T> {
    heap: BinaryHeap<QueueItem<T>>,
    live: HashMap<T, (f64, u64)>,
    order: u64,
}

impl<T: Hash + Eq + Clone> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq + Clone> PriorityQueue<T> {
    pub fn new() -> Self {
        PriorityQueue {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            order: 0,
        }
    }

    /// Inserts `item`, replacing any priority it already had.
    pub fn push(&mut self, item: T, priority: f64) {
        self.order += 1;
        self.live.insert(item.clone(), (priority, self.order));
        self.heap.push(QueueItem {
            priority,
            order: self.order,
            item,
        });
    }

    /// Inserts `item`, or lowers its priority if it is queued with a higher one.
    pub fn update(&mut self, item: T, priority: f64) {
        match self.live.get(&item) {
            Some(&(current, _)) if current <= priority => {}
            _ => self.push(item, priority),
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        while let Some(entry) = self.heap.pop() {
            let is_live = matches!(self.live.get(&entry.item), Some(&(_, order)) if order == entry.order);
            if is_live {
                self.live.remove(&entry.item);
                return Some(entry.item);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
