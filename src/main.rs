use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use rectpaint::canvas::{distance, Canvas};
use rectpaint::engine::{solve, SolveConfig};
use rectpaint::search::CancelToken;
use rectpaint::{isl, persist};

/// approximate an image with flat-colored rectangles.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// target image (any format the image crate can decode)
    input: PathBuf,

    /// where to write the rectangle list
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// resume from an existing rectangle list at the output path
    #[arg(long)]
    resume: bool,

    /// write the rendered approximation as a PNG
    #[arg(long)]
    render: Option<PathBuf>,

    /// write a grayscale difference image against the target
    #[arg(long)]
    diff: Option<PathBuf>,

    /// write the cut/color/merge command listing
    #[arg(long)]
    isl: Option<PathBuf>,

    /// search steps to run
    #[arg(long, default_value_t = 5000)]
    steps: usize,

    /// beam width of the search frontier
    #[arg(long, default_value_t = 1000)]
    beam: usize,

    /// rectangles to prune after the search
    #[arg(long, default_value_t = 5)]
    eliminate: usize,

    /// RNG seed; a fixed seed replays the same search
    #[arg(long, default_value_t = 0xDEAD_BEEF)]
    seed: u64,

    /// resolve fill colors with the coordinate-descent solver instead of the plain average
    #[arg(long)]
    high_fidelity: bool,
}

fn save_png(canvas: &Canvas, path: &PathBuf) -> anyhow::Result<()> {
    let mut img = image::RgbaImage::new(canvas.width(), canvas.height());
    for (x, y, out) in img.enumerate_pixels_mut() {
        let p = canvas.get(x, y);
        *out = image::Rgba([
            p[0].clamp(0, 255) as u8,
            p[1].clamp(0, 255) as u8,
            p[2].clamp(0, 255) as u8,
            p[3].clamp(0, 255) as u8,
        ]);
    }
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn save_diff(target: &Canvas, rendered: &Canvas, path: &PathBuf) -> anyhow::Result<()> {
    let mut img = image::RgbaImage::new(target.width(), target.height());
    for (x, y, out) in img.enumerate_pixels_mut() {
        let d = distance(target.get(x, y), rendered.get(x, y));
        let gray = (d / 2.0).min(255.0) as u8;
        *out = image::Rgba([gray, gray, gray, 255]);
    }
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let img = image::open(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    let target = Arc::new(Canvas::from_rgba8(width, height, img.as_raw())?);

    let initial = if args.resume && args.output.exists() {
        let json = fs::read_to_string(&args.output)
            .with_context(|| format!("reading {}", args.output.display()))?;
        let rects = persist::from_json(&json, height)?;
        tracing::info!(rects = rects.len(), "resuming from previous output");
        rects
    } else {
        Vec::new()
    };

    let mut cfg = SolveConfig {
        steps: args.steps,
        beam_width: args.beam,
        eliminate: args.eliminate,
        seed: args.seed,
        ..SolveConfig::default()
    };
    cfg.cost.high_fidelity = args.high_fidelity;

    let solution = solve(target.clone(), initial, &cfg, CancelToken::new());

    fs::write(&args.output, persist::to_json(&solution.rects, height)?)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(
        path = %args.output.display(),
        rects = solution.rects.len(),
        pixel = solution.pixel_penalty,
        total = solution.total_penalty,
        "wrote rectangle list"
    );

    if let Some(path) = &args.render {
        save_png(&solution.rendered, path)?;
    }
    if let Some(path) = &args.diff {
        save_diff(&target, &solution.rendered, path)?;
    }
    if let Some(path) = &args.isl {
        let commands = isl::generate(&target, &solution.rects);
        fs::write(path, commands.join("\n") + "\n")
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
