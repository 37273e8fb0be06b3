// candidate solutions: an ordered rectangle list and its penalties
//
// list order is z-order: the front of the list is painted last and so sits
// on top of everything behind it. a candidate is a value; both penalties are
// computed once at construction and "mutating" always builds a new one.

use std::sync::Arc;

use crate::canvas::{Canvas, Pixel};
use crate::color::{average, find_best_color};
use crate::geom::Rect;

/// tunable cost-model constants. they shape the optimization's equilibrium;
/// change them deliberately.
#[derive(Clone, Debug)]
pub struct CostConfig {
    /// flat charge per rectangle.
    pub rect_cost: f64,
    /// weight on the inverse-area term; small rectangles cost more.
    pub area_weight: f64,
    /// resolve fill colors with the coordinate-descent solver instead of the
    /// plain average.
    pub high_fidelity: bool,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            rect_cost: 10.0,
            area_weight: 6.0,
            high_fidelity: false,
        }
    }
}

/// resolve one fill color per rectangle, walking the list front to back and
/// masking off pixels as each rectangle claims them, then a final background
/// color over whatever stayed unclaimed. returns `rects.len() + 1` colors
/// with the background last.
pub fn layer_colors(target: &Canvas, rects: &[Rect], high_fidelity: bool) -> Vec<Pixel> {
    let mut mask = Canvas::new(target.width(), target.height());
    let claimed = [1, 1, 1, 1];

    let mut colors = Vec::with_capacity(rects.len() + 1);
    for &r in rects {
        let color = if high_fidelity {
            find_best_color(target, r, Some(&mask))
        } else {
            average(target.pixels(r, Some(&mask)))
        };
        colors.push(color);
        mask.fill(r, claimed);
    }

    colors.push(average(target.pixels(target.bounds(), Some(&mask))));
    colors
}

/// paint the candidate: background first, then rectangles in reverse list
/// order so the front of the list ends up on top. deterministic for a given
/// list and target.
pub fn render_rects(target: &Canvas, rects: &[Rect], high_fidelity: bool) -> Canvas {
    let colors = layer_colors(target, rects, high_fidelity);
    let mut out = Canvas::new(target.width(), target.height());
    out.fill(out.bounds(), colors[rects.len()]);
    for i in (0..rects.len()).rev() {
        out.fill(rects[i], colors[i]);
    }

    out
}

/// one paintable approximation of the target image.
#[derive(Clone, Debug)]
pub struct Candidate {
    rects: Vec<Rect>,
    target: Arc<Canvas>,
    high_fidelity: bool,
    pixel_penalty: f64,
    total_penalty: f64,
}

impl Candidate {
    pub fn new(target: Arc<Canvas>, rects: Vec<Rect>, cost: &CostConfig) -> Self {
        let rendered = render_rects(&target, &rects, cost.high_fidelity);
        let pixel_penalty = rendered.diff(&target);

        let canvas_area = target.width() as f64 * target.height() as f64;
        let structural: f64 = rects
            .iter()
            .map(|r| cost.rect_cost + cost.area_weight * canvas_area / r.area() as f64)
            .sum();

        Candidate {
            total_penalty: pixel_penalty + structural,
            pixel_penalty,
            high_fidelity: cost.high_fidelity,
            rects,
            target,
        }
    }

    #[inline]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    #[inline]
    pub fn target(&self) -> &Arc<Canvas> {
        &self.target
    }

    /// fidelity cost of the rendered approximation against the target.
    #[inline]
    pub fn pixel_penalty(&self) -> f64 {
        self.pixel_penalty
    }

    /// fidelity plus structural cost; the search minimizes this.
    #[inline]
    pub fn total_penalty(&self) -> f64 {
        self.total_penalty
    }

    pub fn render(&self) -> Canvas {
        render_rects(&self.target, &self.rects, self.high_fidelity)
    }

    /// per-rectangle resolved colors plus the background color, in list
    /// order. this is the palette downstream instruction emission consumes.
    pub fn resolved_colors(&self) -> Vec<Pixel> {
        layer_colors(&self.target, &self.rects, self.high_fidelity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_target(w: u32, h: u32, color: Pixel) -> Arc<Canvas> {
        let mut c = Canvas::new(w, h);
        c.fill(c.bounds(), color);
        Arc::new(c)
    }

    #[test]
    fn empty_list_renders_the_whole_canvas_average() {
        let mut c = Canvas::new(2, 1);
        c.set(0, 0, [100, 0, 0, 255]);
        c.set(1, 0, [200, 0, 0, 255]);
        let rendered = render_rects(&c, &[], false);
        assert_eq!(rendered.get(0, 0), [150, 0, 0, 255]);
        assert_eq!(rendered.get(1, 0), [150, 0, 0, 255]);
    }

    #[test]
    fn exact_cover_of_a_uniform_target_has_zero_pixel_penalty() {
        let target = flat_target(10, 10, [40, 80, 120, 255]);
        let cand = Candidate::new(
            target,
            vec![Rect::new(0, 0, 10, 10)],
            &CostConfig::default(),
        );
        assert_eq!(cand.pixel_penalty(), 0.0);
        // only the structural term remains: 10 + 6 * 100 / 100
        assert!((cand.total_penalty() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn rendering_is_deterministic() {
        let target = flat_target(8, 8, [1, 2, 3, 4]);
        let rects = vec![Rect::new(1, 1, 3, 3), Rect::new(4, 4, 2, 2)];
        let a = render_rects(&target, &rects, false);
        let b = render_rects(&target, &rects, false);
        assert_eq!(a, b);
    }

    #[test]
    fn disjoint_rects_commute() {
        let mut c = Canvas::new(8, 4);
        c.fill(Rect::new(0, 0, 4, 4), [200, 10, 10, 255]);
        c.fill(Rect::new(4, 0, 4, 4), [10, 200, 10, 255]);
        let target = Arc::new(c);

        let cost = CostConfig::default();
        let ab = Candidate::new(
            target.clone(),
            vec![Rect::new(0, 0, 4, 4), Rect::new(4, 0, 4, 4)],
            &cost,
        );
        let ba = Candidate::new(
            target.clone(),
            vec![Rect::new(4, 0, 4, 4), Rect::new(0, 0, 4, 4)],
            &cost,
        );

        assert_eq!(ab.render(), ba.render());
        assert_eq!(ab.pixel_penalty(), ba.pixel_penalty());
        assert_eq!(ab.total_penalty(), ba.total_penalty());
    }

    #[test]
    fn front_of_list_paints_on_top() {
        // two overlapping rects on a split target: the front rect keeps its
        // own color in the overlap
        let mut c = Canvas::new(4, 1);
        c.set(0, 0, [255, 0, 0, 255]);
        c.set(1, 0, [255, 0, 0, 255]);
        c.set(2, 0, [0, 255, 0, 255]);
        c.set(3, 0, [0, 255, 0, 255]);
        let target = Arc::new(c);

        let front = Rect::new(0, 0, 2, 1);
        let back = Rect::new(0, 0, 4, 1);
        let cand = Candidate::new(target, vec![front, back], &CostConfig::default());
        let rendered = cand.render();

        // front claimed the red pixels; back averaged only the green leftover
        assert_eq!(rendered.get(0, 0), [255, 0, 0, 255]);
        assert_eq!(rendered.get(3, 0), [0, 255, 0, 255]);
    }

    #[test]
    fn structural_penalty_charges_small_rects_more() {
        let target = flat_target(10, 10, [0, 0, 0, 255]);
        let cost = CostConfig::default();
        let big = Candidate::new(target.clone(), vec![Rect::new(0, 0, 10, 10)], &cost);
        let small = Candidate::new(target.clone(), vec![Rect::new(0, 0, 1, 1)], &cost);
        assert!(small.total_penalty() > big.total_penalty());
    }
}
