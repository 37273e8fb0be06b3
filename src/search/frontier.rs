// pluggable frontier containers for the search driver
//
// every container answers one question: which pending entry gets expanded
// next. ordering predicates read as `less(a, b)` == "a is worse than b", so
// `pop` always returns the best retained item.

use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

/// shared ordering predicate: `less(a, b)` is true when `a` is worse than `b`.
pub type LessFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

/// "pick next node to expand" abstraction.
///
/// `peek_mut` exists so the driver can advance the top entry's child
/// iterator in place; implementations rely on callers not changing anything
/// the ordering predicate observes.
pub trait Frontier<T> {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn push(&mut self, item: T);
    fn pop(&mut self) -> Option<T>;
    fn peek(&self) -> Option<&T>;
    fn peek_mut(&mut self) -> Option<&mut T>;
}

impl<T> Frontier<T> for Box<dyn Frontier<T>> {
    fn len(&self) -> usize {
        (**self).len()
    }
    fn push(&mut self, item: T) {
        (**self).push(item)
    }
    fn pop(&mut self) -> Option<T> {
        (**self).pop()
    }
    fn peek(&self) -> Option<&T> {
        (**self).peek()
    }
    fn peek_mut(&mut self) -> Option<&mut T> {
        (**self).peek_mut()
    }
}

/// classic array-backed binary heap keyed by a `less` predicate. the heap
/// invariant is that no parent is worse than either child, so the root is
/// the best pending item.
pub struct PriorityQueue<T> {
    items: Vec<T>,
    less: LessFn<T>,
}

impl<T> PriorityQueue<T> {
    pub fn new(less: impl Fn(&T, &T) -> bool + 'static) -> Self {
        PriorityQueue {
            items: Vec::new(),
            less: Rc::new(less),
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if (self.less)(&self.items[parent], &self.items[i]) {
                self.items.swap(parent, i);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let mut best = i;
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            if left < self.items.len() && (self.less)(&self.items[best], &self.items[left]) {
                best = left;
            }
            if right < self.items.len() && (self.less)(&self.items[best], &self.items[right]) {
                best = right;
            }
            if best == i {
                return;
            }
            self.items.swap(i, best);
            i = best;
        }
    }
}

impl<T> Frontier<T> for PriorityQueue<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let item = self.items.pop();
        self.sift_down(0);
        item
    }

    fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.first_mut()
    }
}

/// fixed-width beam: a bucketed priority structure capped at `max_items`.
///
/// items with equivalent keys share a bucket, kept in insertion order and
/// consumed newest-first. when full, a pushed item worse than the current
/// worst is dropped outright; otherwise the single worst retained item is
/// evicted after insertion. an optional `equal` predicate suppresses
/// duplicate insertions within a bucket. the worst key is always read from
/// the live bucket list, so an emptied queue cannot serve a stale cache.
pub struct BoundedPriorityQueue<T> {
    // best bucket first; buckets are never empty
    buckets: Vec<Vec<T>>,
    less: LessFn<T>,
    equal: Option<LessFn<T>>,
    max_items: Option<usize>,
    len: usize,
}

impl<T> BoundedPriorityQueue<T> {
    pub fn new(max_items: Option<usize>, less: impl Fn(&T, &T) -> bool + 'static) -> Self {
        Self::from_parts(Rc::new(less), max_items, None)
    }

    pub fn with_equal(
        max_items: Option<usize>,
        less: impl Fn(&T, &T) -> bool + 'static,
        equal: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        Self::from_parts(Rc::new(less), max_items, Some(Rc::new(equal)))
    }

    pub(crate) fn from_parts(
        less: LessFn<T>,
        max_items: Option<usize>,
        equal: Option<LessFn<T>>,
    ) -> Self {
        BoundedPriorityQueue {
            buckets: Vec::new(),
            less,
            equal,
            max_items,
            len: 0,
        }
    }

    /// bucket with a key equivalent to `item`, or the insertion position for
    /// a fresh bucket.
    fn locate(&self, item: &T) -> Result<usize, usize> {
        let mut lo = 0;
        let mut hi = self.buckets.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            let rep = &self.buckets[mid][0];
            if (self.less)(rep, item) {
                // bucket is worse, item belongs earlier
                hi = mid;
            } else if (self.less)(item, rep) {
                lo = mid + 1;
            } else {
                return Ok(mid);
            }
        }

        Err(lo)
    }

    fn evict_worst(&mut self) {
        if let Some(bucket) = self.buckets.last_mut() {
            bucket.pop();
            if bucket.is_empty() {
                self.buckets.pop();
            }
            self.len -= 1;
        }
    }
}

impl<T> Frontier<T> for BoundedPriorityQueue<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, item: T) {
        if let Some(max) = self.max_items {
            if self.len >= max {
                if let Some(worst) = self.buckets.last().map(|b| &b[0]) {
                    if (self.less)(&item, worst) {
                        return;
                    }
                }
            }
        }

        match self.locate(&item) {
            Ok(i) => {
                if let Some(equal) = &self.equal {
                    if self.buckets[i].iter().any(|existing| equal(existing, &item)) {
                        return;
                    }
                }
                self.buckets[i].push(item);
            }
            Err(i) => self.buckets.insert(i, vec![item]),
        }
        self.len += 1;

        if let Some(max) = self.max_items {
            if self.len > max {
                self.evict_worst();
            }
        }
    }

    fn pop(&mut self) -> Option<T> {
        let bucket = self.buckets.first_mut()?;
        let item = bucket.pop();
        if bucket.is_empty() {
            self.buckets.remove(0);
        }
        self.len -= 1;
        item
    }

    fn peek(&self) -> Option<&T> {
        self.buckets.first().and_then(|b| b.last())
    }

    fn peek_mut(&mut self) -> Option<&mut T> {
        self.buckets.first_mut().and_then(|b| b.last_mut())
    }
}

/// LIFO frontier: depth-first expansion.
#[derive(Default)]
pub struct DepthFirstFrontier<T>(Vec<T>);

impl<T> DepthFirstFrontier<T> {
    pub fn new() -> Self {
        DepthFirstFrontier(Vec::new())
    }
}

impl<T> Frontier<T> for DepthFirstFrontier<T> {
    fn len(&self) -> usize {
        self.0.len()
    }
    fn push(&mut self, item: T) {
        self.0.push(item)
    }
    fn pop(&mut self) -> Option<T> {
        self.0.pop()
    }
    fn peek(&self) -> Option<&T> {
        self.0.last()
    }
    fn peek_mut(&mut self) -> Option<&mut T> {
        self.0.last_mut()
    }
}

/// FIFO frontier: breadth-first expansion.
#[derive(Default)]
pub struct BreadthFirstFrontier<T>(VecDeque<T>);

impl<T> BreadthFirstFrontier<T> {
    pub fn new() -> Self {
        BreadthFirstFrontier(VecDeque::new())
    }
}

impl<T> Frontier<T> for BreadthFirstFrontier<T> {
    fn len(&self) -> usize {
        self.0.len()
    }
    fn push(&mut self, item: T) {
        self.0.push_back(item)
    }
    fn pop(&mut self) -> Option<T> {
        self.0.pop_front()
    }
    fn peek(&self) -> Option<&T> {
        self.0.front()
    }
    fn peek_mut(&mut self) -> Option<&mut T> {
        self.0.front_mut()
    }
}

/// per-generation beam: one bounded priority queue per depth tier, always
/// served shallowest tier first, so pruning in deep generations never
/// starves earlier ones.
pub struct BoundedBreadthFirstSearch<T> {
    tiers: BTreeMap<usize, BoundedPriorityQueue<T>>,
    less: LessFn<T>,
    equal: Option<LessFn<T>>,
    depth: Rc<dyn Fn(&T) -> usize>,
    max_items: Option<usize>,
    len: usize,
}

impl<T> BoundedBreadthFirstSearch<T> {
    pub fn new(
        max_items: Option<usize>,
        depth: impl Fn(&T) -> usize + 'static,
        less: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        BoundedBreadthFirstSearch {
            tiers: BTreeMap::new(),
            less: Rc::new(less),
            equal: None,
            depth: Rc::new(depth),
            max_items,
            len: 0,
        }
    }

    pub fn with_equal(
        max_items: Option<usize>,
        depth: impl Fn(&T) -> usize + 'static,
        less: impl Fn(&T, &T) -> bool + 'static,
        equal: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        BoundedBreadthFirstSearch {
            tiers: BTreeMap::new(),
            less: Rc::new(less),
            equal: Some(Rc::new(equal)),
            depth: Rc::new(depth),
            max_items,
            len: 0,
        }
    }
}

impl<T> Frontier<T> for BoundedBreadthFirstSearch<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, item: T) {
        let tier = (self.depth)(&item);
        let less = self.less.clone();
        let equal = self.equal.clone();
        let max_items = self.max_items;
        let queue = self
            .tiers
            .entry(tier)
            .or_insert_with(|| BoundedPriorityQueue::from_parts(less, max_items, equal));
        let before = queue.len();
        queue.push(item);
        self.len = self.len + queue.len() - before;
    }

    fn pop(&mut self) -> Option<T> {
        let (&tier, queue) = self.tiers.iter_mut().next()?;
        let item = queue.pop();
        if queue.is_empty() {
            self.tiers.remove(&tier);
        }
        if item.is_some() {
            self.len -= 1;
        }
        item
    }

    fn peek(&self) -> Option<&T> {
        self.tiers.values().next().and_then(|q| q.peek())
    }

    fn peek_mut(&mut self) -> Option<&mut T> {
        self.tiers.values_mut().next().and_then(|q| q.peek_mut())
    }
}
