// in-memory pixel grid and the scoring metric
//
// pixels are 4-channel integers (nominally RGBA in 0..=255) and are never
// clamped during intermediate arithmetic. a canvas exclusively owns its
// storage; sharing across candidate states happens one level up via Arc.

use crate::geom::Rect;

/// one pixel, channels 0..=3. copied by value everywhere.
pub type Pixel = [i32; 4];

/// the contest's fixed square problem size. the canvas type itself stays
/// general over width x height.
pub const CANVAS_SIZE: u32 = 400;

/// scoring constant applied to every summed pixel distance. must stay exact
/// for score compatibility with downstream tooling.
pub const SCORE_SCALE: f64 = 0.005;

/// euclidean distance between two pixels over all 4 channels.
#[inline]
pub fn distance(p: Pixel, q: Pixel) -> f64 {
    let d0 = (p[0] - q[0]) as f64;
    let d1 = (p[1] - q[1]) as f64;
    let d2 = (p[2] - q[2]) as f64;
    let d3 = (p[3] - q[3]) as f64;
    (d0 * d0 + d1 * d1 + d2 * d2 + d3 * d3).sqrt()
}

/// fixed-size mutable grid of pixels, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<Pixel>,
}

impl Canvas {
    /// all-zero canvas. a zeroed canvas doubles as an "unclaimed" mask.
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            width,
            height,
            data: vec![[0; 4]; width as usize * height as usize],
        }
    }

    /// build a canvas from a tightly packed RGBA8 buffer (e.g. a decoded PNG).
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> crate::error::PaintResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(crate::error::PaintError::geometry(format!(
                "rgba buffer is {} bytes, expected {} for {}x{}",
                rgba.len(),
                expected,
                width,
                height
            )));
        }

        let data = rgba
            .chunks_exact(4)
            .map(|c| [c[0] as i32, c[1] as i32, c[2] as i32, c[3] as i32])
            .collect();

        Ok(Canvas {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// rect covering the whole canvas.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// no bounds checking beyond debug builds; callers guarantee validity.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Pixel {
        debug_assert!(x < self.width && y < self.height);
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) {
        debug_assert!(x < self.width && y < self.height);
        let i = self.index(x, y);
        self.data[i] = pixel;
    }

    /// write `pixel` to every cell of `rect`.
    pub fn fill(&mut self, rect: Rect, pixel: Pixel) {
        debug_assert!(rect.is_valid(self.width, self.height));
        for iy in 0..rect.dy {
            let row = (rect.y + iy) as usize * self.width as usize;
            let start = row + rect.x as usize;
            let end = start + rect.dx as usize;
            self.data[start..end].fill(pixel);
        }
    }

    /// lazy, restartable walk over the pixels of `rect`. when a mask canvas
    /// is given, only cells whose mask channel 0 is zero ("unclaimed") are
    /// produced. the mask is addressed at absolute canvas coordinates.
    pub fn pixels<'a>(
        &'a self,
        rect: Rect,
        mask: Option<&'a Canvas>,
    ) -> impl Iterator<Item = Pixel> + 'a {
        debug_assert!(rect.is_valid(self.width, self.height));
        (0..rect.dy)
            .flat_map(move |iy| (0..rect.dx).map(move |ix| (rect.x + ix, rect.y + iy)))
            .filter(move |&(x, y)| match mask {
                Some(m) => m.get(x as u32, y as u32)[0] == 0,
                None => true,
            })
            .map(move |(x, y)| self.get(x as u32, y as u32))
    }

    /// summed pixel distance to `other` over the whole canvas, scaled by
    /// [`SCORE_SCALE`].
    pub fn diff(&self, other: &Canvas) -> f64 {
        self.diff_region(other, self.bounds(), None)
    }

    /// summed pixel distance to `other` over `rect`, optionally restricted
    /// to unclaimed mask cells, scaled by [`SCORE_SCALE`].
    pub fn diff_region(&self, other: &Canvas, rect: Rect, mask: Option<&Canvas>) -> f64 {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        let mut penalty = 0.0;
        for iy in 0..rect.dy {
            for ix in 0..rect.dx {
                let x = (rect.x + ix) as u32;
                let y = (rect.y + iy) as u32;
                if let Some(m) = mask {
                    if m.get(x, y)[0] != 0 {
                        continue;
                    }
                }
                penalty += distance(self.get(x, y), other.get(x, y));
            }
        }

        penalty * SCORE_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_zero_on_identity_and_symmetric() {
        let p = [10, 20, 30, 255];
        let q = [13, 16, 30, 250];
        assert_eq!(distance(p, p), 0.0);
        assert_eq!(distance(p, q), distance(q, p));
    }

    #[test]
    fn diff_of_identical_canvases_is_zero() {
        let mut a = Canvas::new(8, 8);
        a.fill(a.bounds(), [7, 8, 9, 255]);
        let b = a.clone();
        assert_eq!(a.diff(&b), 0.0);
    }

    #[test]
    fn diff_applies_score_scale() {
        // single differing pixel at distance 5 (3-4-0-0 triangle)
        let a = Canvas::new(1, 1);
        let mut b = Canvas::new(1, 1);
        b.set(0, 0, [3, 4, 0, 0]);
        assert!((a.diff(&b) - 5.0 * SCORE_SCALE).abs() < 1e-12);
    }

    #[test]
    fn fill_touches_only_the_rect() {
        let mut c = Canvas::new(4, 4);
        c.fill(Rect::new(1, 1, 2, 2), [9, 9, 9, 9]);
        assert_eq!(c.get(0, 0), [0, 0, 0, 0]);
        assert_eq!(c.get(1, 1), [9, 9, 9, 9]);
        assert_eq!(c.get(2, 2), [9, 9, 9, 9]);
        assert_eq!(c.get(3, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn pixels_respects_absolute_mask_cells() {
        let mut c = Canvas::new(4, 4);
        c.fill(c.bounds(), [1, 2, 3, 4]);

        let mut mask = Canvas::new(4, 4);
        mask.fill(Rect::new(2, 0, 2, 4), [1, 1, 1, 1]);

        // right half claimed: only the left 2 columns of the rect survive
        let rect = Rect::new(1, 0, 3, 4);
        let visible: Vec<_> = c.pixels(rect, Some(&mask)).collect();
        assert_eq!(visible.len(), 4);
        assert!(visible.iter().all(|&p| p == [1, 2, 3, 4]));
    }

    #[test]
    fn pixels_is_restartable() {
        let c = Canvas::new(3, 3);
        let it = c.pixels(c.bounds(), None);
        assert_eq!(it.count(), 9);
        let it = c.pixels(c.bounds(), None);
        assert_eq!(it.count(), 9);
    }

    #[test]
    fn from_rgba8_rejects_bad_lengths() {
        assert!(Canvas::from_rgba8(2, 2, &[0u8; 15]).is_err());
        assert!(Canvas::from_rgba8(2, 2, &[0u8; 16]).is_ok());
    }
}
