// axis-aligned integer rectangles
//
// a rect is a pure value: equality is geometric (position + size), there is
// no identity or name attached. validity is always judged against a concrete
// canvas size, never stored.

use serde::{Deserialize, Serialize};

/// axis-aligned rectangle with integer origin and extent. `dx`/`dy` must be
/// positive for the rect to be valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Rect {
    #[inline]
    pub fn new(x: i32, y: i32, dx: i32, dy: i32) -> Self {
        Rect { x, y, dx, dy }
    }

    /// true iff the rect has positive extent and lies fully inside a
    /// `width` x `height` canvas.
    #[inline]
    pub fn is_valid(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.dx > 0
            && self.dy > 0
            && self.x + self.dx <= width as i32
            && self.y + self.dy <= height as i32
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.dx && y >= self.y && y < self.y + self.dy
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.dx as i64 * self.dy as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_matches_canvas_bounds() {
        assert!(Rect::new(0, 0, 400, 400).is_valid(400, 400));
        assert!(Rect::new(395, 395, 5, 5).is_valid(400, 400));
        assert!(!Rect::new(-1, 0, 5, 5).is_valid(400, 400));
        assert!(!Rect::new(0, -1, 5, 5).is_valid(400, 400));
        assert!(!Rect::new(396, 0, 5, 5).is_valid(400, 400));
        assert!(!Rect::new(0, 396, 5, 5).is_valid(400, 400));
        assert!(!Rect::new(0, 0, 0, 5).is_valid(400, 400));
        assert!(!Rect::new(0, 0, 5, 0).is_valid(400, 400));
        assert!(!Rect::new(0, 0, -5, 5).is_valid(400, 400));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10, 20, 5, 5);
        assert!(r.contains(10, 20));
        assert!(r.contains(14, 24));
        assert!(!r.contains(15, 24));
        assert!(!r.contains(14, 25));
        assert!(!r.contains(9, 20));
    }

    #[test]
    fn equality_is_geometric() {
        assert_eq!(Rect::new(1, 2, 3, 4), Rect::new(1, 2, 3, 4));
        assert_ne!(Rect::new(1, 2, 3, 4), Rect::new(1, 2, 4, 3));
    }
}
