// flat fill color selection
//
// two strategies: the plain channel-wise average, and a bounded per-channel
// coordinate descent that starts from the average and walks each of R, G, B
// one step at a time toward lower masked fill cost. the descent is a greedy
// hill-climb and deliberately not a global optimum; downstream penalty
// comparisons depend on this exact convergence behavior.

use crate::canvas::{distance, Canvas, Pixel, SCORE_SCALE};
use crate::geom::Rect;

/// descent rounds are capped so a stalled plateau still terminates.
const MAX_ROUNDS: usize = 256;

/// channel-wise average with truncating integer division. an empty pixel
/// sequence yields the all-zero sentinel rather than failing; coverage can
/// legitimately drop to zero during search.
pub fn average(pixels: impl Iterator<Item = Pixel>) -> Pixel {
    let mut sum = [0i64; 4];
    let mut n = 0i64;
    for p in pixels {
        sum[0] += p[0] as i64;
        sum[1] += p[1] as i64;
        sum[2] += p[2] as i64;
        sum[3] += p[3] as i64;
        n += 1;
    }

    if n == 0 {
        return [0; 4];
    }

    [
        (sum[0] / n) as i32,
        (sum[1] / n) as i32,
        (sum[2] / n) as i32,
        (sum[3] / n) as i32,
    ]
}

/// cost of filling the unclaimed cells of `rect` with one flat `color`.
pub fn flat_cost(canvas: &Canvas, rect: Rect, mask: Option<&Canvas>, color: Pixel) -> f64 {
    canvas
        .pixels(rect, mask)
        .map(|p| distance(p, color))
        .sum::<f64>()
        * SCORE_SCALE
}

/// near-optimal flat fill color for the unclaimed cells of `rect`.
///
/// starts from the channel-wise average (alpha included) and then runs
/// coordinate descent on R, G, B only: each round probes a +1 step per
/// channel (clamped to 255) and moves that channel by one in the direction
/// of decreasing cost, ties favoring the decrement. stops on an exact fit,
/// on any round that fails to strictly improve the baseline, or at the
/// round cap. alpha is never adjusted after the initial average.
pub fn find_best_color(canvas: &Canvas, rect: Rect, mask: Option<&Canvas>) -> Pixel {
    let mut candidate = average(canvas.pixels(rect, mask));
    let mut best = candidate;
    let mut best_cost = f64::INFINITY;

    for _ in 0..MAX_ROUNDS {
        let baseline = flat_cost(canvas, rect, mask, candidate);
        if baseline == 0.0 {
            return candidate;
        }
        if baseline >= best_cost {
            return best;
        }
        best = candidate;
        best_cost = baseline;

        for channel in 0..3 {
            let mut probe = candidate;
            probe[channel] = (probe[channel] + 1).min(255);
            if flat_cost(canvas, rect, mask, probe) < baseline {
                candidate[channel] = probe[channel];
            } else {
                candidate[channel] -= 1;
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_truncates_and_handles_empty() {
        let px = [[1, 2, 3, 4], [2, 3, 4, 5]].into_iter();
        assert_eq!(average(px), [1, 2, 3, 4]);
        assert_eq!(average(std::iter::empty()), [0, 0, 0, 0]);
    }

    #[test]
    fn best_color_of_uniform_region_is_exact() {
        let mut c = Canvas::new(8, 8);
        c.fill(c.bounds(), [120, 30, 77, 255]);
        let got = find_best_color(&c, Rect::new(2, 2, 4, 4), None);
        assert_eq!(got, [120, 30, 77, 255]);
    }

    #[test]
    fn best_color_improves_on_the_average_or_matches_it() {
        let mut c = Canvas::new(4, 1);
        c.set(0, 0, [0, 0, 0, 255]);
        c.set(1, 0, [0, 0, 0, 255]);
        c.set(2, 0, [0, 0, 0, 255]);
        c.set(3, 0, [90, 0, 0, 255]);

        let rect = c.bounds();
        let avg = average(c.pixels(rect, None));
        let best = find_best_color(&c, rect, None);
        assert!(flat_cost(&c, rect, None, best) <= flat_cost(&c, rect, None, avg));
    }

    #[test]
    fn fully_masked_region_yields_zero_sentinel() {
        let mut c = Canvas::new(4, 4);
        c.fill(c.bounds(), [50, 60, 70, 255]);
        let mut mask = Canvas::new(4, 4);
        mask.fill(mask.bounds(), [1, 1, 1, 1]);
        assert_eq!(find_best_color(&c, c.bounds(), Some(&mask)), [0, 0, 0, 0]);
    }

    #[test]
    fn alpha_is_never_adjusted_past_the_average() {
        let mut c = Canvas::new(2, 1);
        c.set(0, 0, [10, 10, 10, 100]);
        c.set(1, 0, [200, 10, 10, 200]);
        let best = find_best_color(&c, c.bounds(), None);
        // alpha stays at the truncated average of 100 and 200
        assert_eq!(best[3], 150);
    }
}
