// generic lazy graph search
//
// the driver owns a frontier of (node, pending child iterator) pairs and
// yields one visited node per step: peek the best entry, pull one child from
// its iterator, push the child with a fresh iterator of its own. exhausted
// entries are popped and discarded. only one pending child iterator is live
// per entry, so an expensive or enormous neighbor generator never inflates
// memory beyond the frontier itself.

pub mod frontier;

pub use frontier::{
    BoundedBreadthFirstSearch, BoundedPriorityQueue, BreadthFirstFrontier, DepthFirstFrontier,
    Frontier, PriorityQueue,
};

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// one node of the search tree. nodes hold back-pointers only; the tree is
/// reconstructed by walking parents, and subtrees are freed as soon as no
/// frontier entry or best-so-far slot can reach them.
pub struct SearchNode<S, M> {
    state: S,
    incoming: Option<M>,
    parent: Option<Arc<SearchNode<S, M>>>,
    depth: usize,
}

impl<S, M> SearchNode<S, M> {
    pub fn root(state: S) -> Arc<Self> {
        Arc::new(SearchNode {
            state,
            incoming: None,
            parent: None,
            depth: 0,
        })
    }

    /// child node one step below `self`.
    pub fn child(self: &Arc<Self>, state: S, incoming: M) -> Arc<Self> {
        Arc::new(SearchNode {
            state,
            incoming: Some(incoming),
            parent: Some(self.clone()),
            depth: self.depth + 1,
        })
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// move that produced this node; `None` at the root.
    #[inline]
    pub fn incoming(&self) -> Option<&M> {
        self.incoming.as_ref()
    }

    #[inline]
    pub fn parent(&self) -> Option<&Arc<SearchNode<S, M>>> {
        self.parent.as_ref()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// states along the ancestor path, root first, ending at `self`.
    pub fn path_states(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.depth + 1);
        let mut node = Some(self);
        while let Some(n) = node {
            path.push(&n.state);
            node = n.parent.as_deref();
        }
        path.reverse();
        path
    }

    /// moves along the ancestor path, root's first move first.
    pub fn path_moves(&self) -> Vec<&M> {
        let mut moves = Vec::with_capacity(self.depth);
        let mut node = Some(self);
        while let Some(n) = node {
            if let Some(m) = &n.incoming {
                moves.push(m);
            }
            node = n.parent.as_deref();
        }
        moves.reverse();
        moves
    }
}

/// a frontier resident: a node plus its not-yet-exhausted child iterator.
pub struct FrontierEntry<S, M> {
    node: Arc<SearchNode<S, M>>,
    children: ChildIter<S, M>,
}

pub type ChildIter<S, M> = Box<dyn Iterator<Item = Arc<SearchNode<S, M>>>>;

impl<S, M> FrontierEntry<S, M> {
    pub fn new(node: Arc<SearchNode<S, M>>, children: ChildIter<S, M>) -> Self {
        FrontierEntry { node, children }
    }

    #[inline]
    pub fn node(&self) -> &Arc<SearchNode<S, M>> {
        &self.node
    }

    #[inline]
    fn next_child(&mut self) -> Option<Arc<SearchNode<S, M>>> {
        self.children.next()
    }
}

/// cooperative cancellation flag, checked once per search step. a running
/// child-generator call is never interrupted mid-call.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// lazily enumerate the search space reachable from `root` through
/// `expand`. the returned iterator yields every visited node in frontier
/// order; an exhausted frontier ends the sequence cleanly ("no more
/// improvement possible"), it is not an error.
pub fn search<S, M, C, G>(
    root: S,
    mut frontier: C,
    cancel: CancelToken,
    mut expand: G,
) -> Search<S, M, C, G>
where
    C: Frontier<FrontierEntry<S, M>>,
    G: FnMut(&Arc<SearchNode<S, M>>) -> ChildIter<S, M>,
{
    let root = SearchNode::root(root);
    let children = expand(&root);
    frontier.push(FrontierEntry::new(root, children));

    Search {
        frontier,
        expand,
        cancel,
        _marker: PhantomData,
    }
}

/// the driver state machine: either the frontier has pending entries or the
/// search is exhausted. carries the node state and move types so the
/// iterator impl can name them.
pub struct Search<S, M, C, G> {
    frontier: C,
    expand: G,
    cancel: CancelToken,
    _marker: PhantomData<(S, M)>,
}

impl<S, M, C, G> Iterator for Search<S, M, C, G>
where
    C: Frontier<FrontierEntry<S, M>>,
    G: FnMut(&Arc<SearchNode<S, M>>) -> ChildIter<S, M>,
{
    type Item = Arc<SearchNode<S, M>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.cancel.is_cancelled() {
            let child = self.frontier.peek_mut()?.next_child();
            match child {
                Some(node) => {
                    let children = (self.expand)(&node);
                    self.frontier
                        .push(FrontierEntry::new(node.clone(), children));
                    return Some(node);
                }
                None => {
                    self.frontier.pop();
                }
            }
        }

        None
    }
}

/// best-first frontier over search nodes: an unbounded priority queue, or a
/// fixed-width beam when `max_items` is given. `less(a, b)` reads "node a is
/// worse than node b".
pub fn best_first<S, M>(
    less: impl Fn(&SearchNode<S, M>, &SearchNode<S, M>) -> bool + 'static,
    max_items: Option<usize>,
) -> Box<dyn Frontier<FrontierEntry<S, M>>>
where
    S: 'static,
    M: 'static,
{
    let entry_less =
        move |a: &FrontierEntry<S, M>, b: &FrontierEntry<S, M>| less(a.node(), b.node());
    match max_items {
        Some(_) => Box::new(BoundedPriorityQueue::new(max_items, entry_less)),
        None => Box::new(PriorityQueue::new(entry_less)),
    }
}
