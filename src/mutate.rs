// neighbor generation for the local search
//
// every mutation step copies the parent's rectangle list, perturbs it, and
// wraps the resulting candidate as a child search node. geometry is kept
// valid by rejection sampling: an invalid rectangle never escapes this
// module, so candidate construction needs no bounds errors.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::candidate::{Candidate, CostConfig};
use crate::geom::Rect;
use crate::search::{ChildIter, SearchNode};

/// mutation policy knobs.
#[derive(Clone, Debug)]
pub struct MutateConfig {
    /// children generated per expansion of a node.
    pub batch_size: usize,
    /// occasionally seed a fresh small rectangle (always seeds when the
    /// list is empty).
    pub insert_rects: bool,
    /// evict a random rectangle when the list exceeds `max_rects`.
    pub evict_rects: bool,
    /// rectangle count cap enforced by eviction.
    pub max_rects: usize,
    /// edge length of freshly seeded rectangles.
    pub seed_size: i32,
    /// 1-in-N chance to seed a fresh rectangle.
    pub seed_denom: u32,
    /// 1-in-N chance to move a random rectangle to the front (z-order).
    pub raise_denom: u32,
}

impl Default for MutateConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            insert_rects: true,
            evict_rects: true,
            max_rects: 30,
            seed_size: 5,
            seed_denom: 25,
            raise_denom: 10,
        }
    }
}

/// geometric perturbation of one rectangle: resample the size delta in
/// [-3, 5] and the position delta in [-2, 4], re-centering the position by
/// half the size change, and retry until the result is valid. the valid
/// space is large relative to the perturbation range, so the loop
/// terminates quickly in practice.
pub fn mutate_rect<R: Rng>(r: Rect, rng: &mut R, width: u32, height: u32) -> Rect {
    loop {
        let ddx = rng.random_range(-3..6);
        let ddy = rng.random_range(-3..6);
        let x = r.x + rng.random_range(-2..5) - ddx / 2;
        let y = r.y + rng.random_range(-2..5) - ddy / 2;
        let candidate = Rect::new(x, y, r.dx + ddx, r.dy + ddy);
        if candidate.is_valid(width, height) {
            return candidate;
        }
    }
}

/// generates neighboring candidates. owns the master RNG; each expansion
/// derives an independent child stream so lazily-consumed batches stay
/// deterministic for a given seed regardless of interleaving.
pub struct Mutator {
    cfg: MutateConfig,
    cost: CostConfig,
    rng: Pcg32,
}

impl Mutator {
    pub fn new(cfg: MutateConfig, cost: CostConfig, seed: u64) -> Self {
        Mutator {
            cfg,
            cost,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// one finite batch of children for `node`, materialized lazily.
    pub fn neighbors(&mut self, node: &Arc<SearchNode<Candidate, ()>>) -> Neighbors {
        Neighbors {
            parent: node.clone(),
            rng: Pcg32::seed_from_u64(self.rng.random()),
            cfg: self.cfg.clone(),
            cost: self.cost.clone(),
            remaining: self.cfg.batch_size,
        }
    }

    /// boxed form for handing straight to the search driver.
    pub fn expand(&mut self, node: &Arc<SearchNode<Candidate, ()>>) -> ChildIter<Candidate, ()> {
        Box::new(self.neighbors(node))
    }
}

/// resumable child generator: one mutation per `next` call, up to the batch
/// size. stored inside a frontier entry and advanced by the driver.
pub struct Neighbors {
    parent: Arc<SearchNode<Candidate, ()>>,
    rng: Pcg32,
    cfg: MutateConfig,
    cost: CostConfig,
    remaining: usize,
}

impl Iterator for Neighbors {
    type Item = Arc<SearchNode<Candidate, ()>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let state = self.parent.state();
        let target = state.target().clone();
        let width = target.width();
        let height = target.height();

        let mut rects = Vec::with_capacity(state.rects().len() + 1);

        // fresh seed rectangles enter at the front (topmost)
        let seed = state.rects().is_empty()
            || (self.cfg.insert_rects && self.rng.random_range(0..self.cfg.seed_denom) == 0);
        if seed {
            // a target smaller than the configured seed still gets a rect
            let size = self.cfg.seed_size.min(width as i32).min(height as i32);
            let x = if (width as i32) > size {
                self.rng.random_range(0..width as i32 - size)
            } else {
                0
            };
            let y = if (height as i32) > size {
                self.rng.random_range(0..height as i32 - size)
            } else {
                0
            };
            rects.push(Rect::new(x, y, size, size));
        }
        rects.extend_from_slice(state.rects());

        if self.cfg.evict_rects && rects.len() > self.cfg.max_rects {
            let idx = self.rng.random_range(0..rects.len());
            rects.remove(idx);
        }

        let idx = self.rng.random_range(0..rects.len());
        rects[idx] = mutate_rect(rects[idx], &mut self.rng, width, height);

        if self.rng.random_range(0..self.cfg.raise_denom) == 0 {
            let idx = self.rng.random_range(0..rects.len());
            let raised = rects.remove(idx);
            rects.insert(0, raised);
        }

        let child = Candidate::new(target, rects, &self.cost);
        Some(self.parent.child(child, ()))
    }
}
