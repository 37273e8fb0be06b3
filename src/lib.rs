//! approximates a raster image with an ordered list of flat-colored,
//! axis-aligned rectangles. a lazy best-first search perturbs candidate
//! rectangle lists; a coordinate-descent color solver picks the paint for
//! each visible region; the result can be persisted as JSON, rendered back
//! to pixels, or compiled into a cut/color/merge command listing.

#![forbid(unsafe_code)]

pub mod candidate;
pub mod canvas;
pub mod color;
pub mod engine;
pub mod error;
pub mod geom;
pub mod isl;
pub mod mutate;
pub mod persist;
pub mod search;

pub use candidate::{Candidate, CostConfig};
pub use canvas::{distance, Canvas, Pixel, CANVAS_SIZE, SCORE_SCALE};
pub use engine::{solve, SolveConfig, Solution};
pub use error::{PaintError, PaintResult};
pub use geom::Rect;
pub use mutate::MutateConfig;
pub use search::CancelToken;
