// instruction emission: cut / color / merge command listings
//
// compiles a finished rectangle list into the textual command language a
// paint robot executes: carve the working block down to each rectangle with
// axis-aligned cuts, color it, then merge the severed pieces back so the
// next rectangle starts from a whole canvas again. command coordinates are
// bottom-origin, matching the persisted format, while the target canvas is
// sampled top-origin.

use crate::canvas::{Canvas, Pixel};
use crate::geom::Rect;

struct CutOption {
    rect: Rect,
    axis: &'static str,
    line: i32,
    keep: u8,
}

/// average color of the cells of `target` (bottom-origin coordinates) not
/// covered by any superior rectangle. truncating division, zero sentinel
/// when fully covered.
fn visible_average(canvas: &Canvas, superior: &[Rect], target: Rect) -> Pixel {
    let height = canvas.height() as i32;
    let mut sum = [0i64; 4];
    let mut n = 0i64;

    for x in target.x..target.x + target.dx {
        for y in target.y..target.y + target.dy {
            if superior.iter().any(|r| r.contains(x, y)) {
                continue;
            }
            let p = canvas.get(x as u32, (height - y - 1) as u32);
            sum[0] += p[0] as i64;
            sum[1] += p[1] as i64;
            sum[2] += p[2] as i64;
            sum[3] += p[3] as i64;
            n += 1;
        }
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

/// compile an internal (topmost-first, top-origin) rectangle list into an
/// ordered command listing. the rectangles are emitted bottom-to-top so
/// later commands paint over earlier ones, mirroring the z-order.
pub fn generate(target: &Canvas, rects: &[Rect]) -> Vec<String> {
    let width = target.width() as i32;
    let height = target.height() as i32;

    // bottom-origin, paint order (reversed z-order)
    let rects: Vec<Rect> = rects
        .iter()
        .rev()
        .map(|&r| Rect::new(r.x, height - r.y - r.dy, r.dx, r.dy))
        .collect();

    let mut commands = Vec::new();
    let mut node_id: u64 = 0;
    let mut last_name = String::from("0");

    for (idx, &target_rect) in rects.iter().enumerate() {
        let mut not_taken: Vec<String> = Vec::new();
        let mut work = Rect::new(0, 0, width, height);
        let mut work_name = node_id.to_string();

        while work != target_rect {
            let left = target_rect.x - work.x;
            let top = target_rect.y - work.y;
            let right = (work.x + work.dx) - (target_rect.x + target_rect.dx);
            let bottom = (work.y + work.dy) - (target_rect.y + target_rect.dy);

            let options = [
                CutOption {
                    rect: Rect::new(target_rect.x, work.y, work.dx - left, work.dy),
                    axis: "x",
                    line: target_rect.x,
                    keep: 1,
                },
                CutOption {
                    rect: Rect::new(work.x, target_rect.y, work.dx, work.dy - top),
                    axis: "y",
                    line: target_rect.y,
                    keep: 1,
                },
                CutOption {
                    rect: Rect::new(work.x, work.y, work.dx - right, work.dy),
                    axis: "x",
                    line: target_rect.x + target_rect.dx,
                    keep: 0,
                },
                CutOption {
                    rect: Rect::new(work.x, work.y, work.dx, work.dy - bottom),
                    axis: "y",
                    line: target_rect.y + target_rect.dy,
                    keep: 0,
                },
            ];

            // greedily keep the largest proper subblock; ties go to the
            // earliest option
            let mut best: Option<&CutOption> = None;
            for option in options.iter().filter(|o| o.rect.area() != work.area()) {
                if best.is_none_or(|b| option.rect.area() > b.rect.area()) {
                    best = Some(option);
                }
            }
            let Some(best) = best else {
                break;
            };

            commands.push(format!("cut [{}] [{}] [{}]", work_name, best.axis, best.line));
            let new_name = format!("{}.{}", work_name, best.keep);
            not_taken.push(format!("{}.{}", work_name, 1 - best.keep));
            work = best.rect;
            work_name = new_name.clone();
            last_name = new_name;
        }

        let color = visible_average(target, &rects[idx + 1..], target_rect);
        commands.push(format!(
            "color [{}] [{}, {}, {}, {}]",
            work_name, color[0], color[1], color[2], color[3]
        ));

        for name in not_taken.iter().rev() {
            commands.push(format!("merge [{}] [{}]", name, last_name));
            node_id += 1;
            last_name = node_id.to_string();
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_canvas_rect_needs_no_cuts() {
        let mut c = Canvas::new(400, 400);
        c.fill(c.bounds(), [10, 20, 30, 255]);
        let commands = generate(&c, &[Rect::new(0, 0, 400, 400)]);
        assert_eq!(commands, vec!["color [0] [10, 20, 30, 255]"]);
    }

    #[test]
    fn interior_rect_cuts_then_colors_then_merges() {
        let mut c = Canvas::new(400, 400);
        c.fill(c.bounds(), [0, 0, 0, 255]);
        // internal (100, 150, 50, 60) -> bottom-origin y = 400 - 150 - 60
        c.fill(Rect::new(100, 150, 50, 60), [255, 0, 0, 255]);

        let commands = generate(&c, &[Rect::new(100, 150, 50, 60)]);

        let cuts = commands.iter().filter(|c| c.starts_with("cut ")).count();
        let colors: Vec<_> = commands
            .iter()
            .filter(|c| c.starts_with("color "))
            .collect();
        let merges = commands.iter().filter(|c| c.starts_with("merge ")).count();

        // one cut per severed side, each merged back afterwards
        assert_eq!(cuts, 4);
        assert_eq!(merges, cuts);
        assert_eq!(colors.len(), 1);
        assert!(colors[0].ends_with("[255, 0, 0, 255]"));

        // first command carves the root block
        assert!(commands[0].starts_with("cut [0] ["));
        // cuts come before the color, merges after
        let color_pos = commands
            .iter()
            .position(|c| c.starts_with("color "))
            .unwrap();
        assert!(commands[..color_pos].iter().all(|c| c.starts_with("cut ")));
        assert!(commands[color_pos + 1..]
            .iter()
            .all(|c| c.starts_with("merge ")));
    }

    #[test]
    fn covered_rect_colors_with_the_zero_sentinel() {
        let mut c = Canvas::new(8, 8);
        c.fill(c.bounds(), [50, 50, 50, 255]);
        // back rect fully hidden behind the front one
        let front = Rect::new(0, 0, 8, 8);
        let back = Rect::new(2, 2, 4, 4);
        let commands = generate(&c, &[front, back]);

        let first_color = commands
            .iter()
            .find(|c| c.starts_with("color "))
            .unwrap();
        assert!(first_color.ends_with("[0, 0, 0, 0]"));
    }

    #[test]
    fn edge_rect_only_cuts_the_severed_sides() {
        let mut c = Canvas::new(400, 400);
        c.fill(c.bounds(), [7, 7, 7, 255]);
        // internal top-left corner rect: bottom-origin it touches the left
        // and top edges, so only two cuts are needed
        let commands = generate(&c, &[Rect::new(0, 0, 100, 100)]);
        let cuts = commands.iter().filter(|c| c.starts_with("cut ")).count();
        assert_eq!(cuts, 2);
    }
}
