// the solve loop: beam search over candidate states
//
// pulls nodes one at a time from the lazy search sequence, keeps the best
// candidate seen, and finishes with a pruning pass that drops the least
// visible rectangles before the final repaint.

use std::sync::Arc;

use crate::candidate::{Candidate, CostConfig};
use crate::canvas::{Canvas, Pixel};
use crate::geom::Rect;
use crate::mutate::{MutateConfig, Mutator};
use crate::search::{best_first, search, CancelToken};

#[derive(Clone, Debug)]
pub struct SolveConfig {
    /// total search steps to pull from the lazy sequence.
    pub steps: usize,
    /// beam width of the best-first frontier.
    pub beam_width: usize,
    /// rectangles to drop in the final pruning pass.
    pub eliminate: usize,
    /// log a progress line every N steps (0 disables).
    pub report_every: usize,
    pub seed: u64,
    pub cost: CostConfig,
    pub mutate: MutateConfig,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            steps: 5000,
            beam_width: 1000,
            eliminate: 5,
            report_every: 100,
            seed: 0xDEAD_BEEF,
            cost: CostConfig::default(),
            mutate: MutateConfig::default(),
        }
    }
}

/// final output of a solve: geometry, resolved palette and penalties.
pub struct Solution {
    /// rectangle list, front = topmost.
    pub rects: Vec<Rect>,
    /// one color per rectangle plus the background color last.
    pub colors: Vec<Pixel>,
    pub pixel_penalty: f64,
    pub total_penalty: f64,
    pub rendered: Canvas,
}

/// drop the `how_many` rectangles with the fewest visible (unclaimed)
/// pixels. the survivors come back ordered by ascending visibility.
pub fn eliminate_rects(target: &Canvas, rects: &[Rect], how_many: usize) -> Vec<Rect> {
    let mut mask = Canvas::new(target.width(), target.height());
    let claimed = [1, 1, 1, 1];

    let mut counts: Vec<(Rect, usize)> = Vec::with_capacity(rects.len());
    for &r in rects {
        let visible = target.pixels(r, Some(&mask)).count();
        counts.push((r, visible));
        mask.fill(r, claimed);
    }

    counts.sort_by_key(|&(_, visible)| visible);
    counts
        .into_iter()
        .skip(how_many)
        .map(|(r, _)| r)
        .collect()
}

/// run the optimization against `target`, starting from `initial` (empty
/// for a fresh solve, or a previously persisted rectangle list).
pub fn solve(
    target: Arc<Canvas>,
    initial: Vec<Rect>,
    cfg: &SolveConfig,
    cancel: CancelToken,
) -> Solution {
    let span = tracing::debug_span!("solve", steps = cfg.steps, beam = cfg.beam_width);
    let _guard = span.enter();

    let root = Candidate::new(target.clone(), initial, &cfg.cost);
    let mut best = root.clone();

    let mut mutator = Mutator::new(cfg.mutate.clone(), cfg.cost.clone(), cfg.seed);
    let frontier = best_first::<Candidate, ()>(
        |a, b| a.state().total_penalty() > b.state().total_penalty(),
        Some(cfg.beam_width),
    );

    let nodes = search(root, frontier, cancel, move |node| mutator.expand(node));
    for (step, node) in nodes.take(cfg.steps).enumerate() {
        let state = node.state();
        if cfg.report_every > 0 && (step + 1) % cfg.report_every == 0 {
            tracing::info!(
                step = step + 1,
                pixel = state.pixel_penalty(),
                total = state.total_penalty(),
                rects = state.rects().len(),
                "search progress"
            );
        }
        if state.total_penalty() < best.total_penalty() {
            best = state.clone();
        }
    }

    let rects = if cfg.eliminate > 0 {
        eliminate_rects(&target, best.rects(), cfg.eliminate)
    } else {
        best.rects().to_vec()
    };

    let pruned = Candidate::new(target, rects, &cfg.cost);
    tracing::info!(
        pixel = pruned.pixel_penalty(),
        total = pruned.total_penalty(),
        rects = pruned.rects().len(),
        "solve finished"
    );

    Solution {
        colors: pruned.resolved_colors(),
        pixel_penalty: pruned.pixel_penalty(),
        total_penalty: pruned.total_penalty(),
        rendered: pruned.render(),
        rects: pruned.rects().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eliminate_drops_the_least_visible_first() {
        let mut c = Canvas::new(20, 20);
        c.fill(c.bounds(), [100, 100, 100, 255]);
        let target = c;

        // the middle rect is fully hidden behind the front one
        let front = Rect::new(0, 0, 10, 10);
        let hidden = Rect::new(2, 2, 4, 4);
        let clear = Rect::new(10, 10, 10, 10);
        let kept = eliminate_rects(&target, &[front, hidden, clear], 1);

        assert_eq!(kept.len(), 2);
        assert!(!kept.contains(&hidden));
    }

    #[test]
    fn eliminate_zero_keeps_everything() {
        let target = Canvas::new(10, 10);
        let rects = [Rect::new(0, 0, 5, 5), Rect::new(5, 5, 5, 5)];
        assert_eq!(eliminate_rects(&target, &rects, 0).len(), 2);
    }
}
