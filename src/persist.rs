// persisted candidate format
//
// on disk a candidate is `{ "rects": [ {x, y, dx, dy}, ... ] }` with two
// boundary conventions that downstream tooling depends on: `y` is measured
// from the bottom of the canvas, and the list is ordered bottom-to-top
// (later entries paint over earlier ones). both are flipped back on load so
// a save/load round trip is the identity.

use serde::{Deserialize, Serialize};

use crate::error::PaintResult;
use crate::geom::Rect;

#[derive(Serialize, Deserialize)]
struct RectFile {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

#[derive(Serialize, Deserialize)]
struct CandidateFile {
    rects: Vec<RectFile>,
}

#[inline]
fn flip_y(r: Rect, canvas_height: u32) -> Rect {
    Rect::new(r.x, canvas_height as i32 - r.y - r.dy, r.dx, r.dy)
}

/// serialize an internal (topmost-first, top-origin) rectangle list.
pub fn to_json(rects: &[Rect], canvas_height: u32) -> PaintResult<String> {
    let file = CandidateFile {
        rects: rects
            .iter()
            .rev()
            .map(|&r| {
                let f = flip_y(r, canvas_height);
                RectFile {
                    x: f.x,
                    y: f.y,
                    dx: f.dx,
                    dy: f.dy,
                }
            })
            .collect(),
    };

    Ok(serde_json::to_string(&file)?)
}

/// parse a persisted rectangle list back to the internal convention.
pub fn from_json(json: &str, canvas_height: u32) -> PaintResult<Vec<Rect>> {
    let file: CandidateFile = serde_json::from_str(json)?;
    let mut rects: Vec<Rect> = file
        .rects
        .into_iter()
        .map(|f| flip_y(Rect::new(f.x, f.y, f.dx, f.dy), canvas_height))
        .collect();
    rects.reverse();
    Ok(rects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_flip_measures_y_from_the_bottom() {
        let json = to_json(&[Rect::new(10, 20, 30, 40)], 400).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["rects"][0]["y"], 340);
        assert_eq!(parsed["rects"][0]["x"], 10);
        assert_eq!(parsed["rects"][0]["dx"], 30);
        assert_eq!(parsed["rects"][0]["dy"], 40);
    }

    #[test]
    fn file_order_is_bottom_to_top() {
        let top = Rect::new(0, 0, 5, 5);
        let bottom = Rect::new(100, 100, 5, 5);
        let json = to_json(&[top, bottom], 400).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["rects"][0]["x"], 100);
        assert_eq!(parsed["rects"][1]["x"], 0);
    }

    #[test]
    fn round_trip_is_identity() {
        let rects = vec![
            Rect::new(1, 2, 3, 4),
            Rect::new(50, 60, 70, 80),
            Rect::new(0, 0, 400, 400),
        ];
        let json = to_json(&rects, 400).unwrap();
        assert_eq!(from_json(&json, 400).unwrap(), rects);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(from_json("{\"rects\": [{\"x\": 1}]}", 400).is_err());
        assert!(from_json("not json", 400).is_err());
    }
}
