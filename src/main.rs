use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use xpm_synth::palette::{preset_colors, random_colors};
use xpm_synth::recolor::recolored_path;
use xpm_synth::{
    Algorithm, Config, Expr, Grid, Palette, Settings, XpmImage, generate,
    generate_from_expression, recolor, save_png, xpm,
};

/// Procedural XPM texture synthesizer.
#[derive(Parser, Debug)]
#[command(name = "xpm-synth", version)]
struct Args {
    /// texture width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// texture height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// algorithm name, or "random" to pick one
    #[arg(long)]
    algo: Option<String>,

    /// replace the palette with six random colors
    #[arg(long)]
    randcolors: bool,

    /// paint a freshly generated random expression
    #[arg(long, alias = "random")]
    random_expr: bool,

    /// paint a previously printed expression, e.g. "sin((x * y))"
    #[arg(long, conflicts_with = "random_expr")]
    expr: Option<String>,

    /// recolor an existing XPM file interactively
    #[arg(long)]
    recolor: Option<PathBuf>,

    /// also write a PNG next to the XPM
    #[arg(long)]
    png: bool,

    /// RNG seed; a random one is chosen and logged if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// output path (defaults to <algorithm>.xpm)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let png = args.png || settings.png;

    if let Some(path) = &args.recolor {
        return recolor_file(path, png);
    }

    let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
    info!(seed, "seeded rng");
    let mut rng = StdRng::seed_from_u64(seed);

    let algorithm = match args.algo.as_deref() {
        Some(name) if name.eq_ignore_ascii_case("random") => {
            Algorithm::ALL[rng.gen_range(0..Algorithm::ALL.len())]
        }
        Some(name) => name.parse()?,
        None => settings.algorithm.unwrap_or(Algorithm::Xor),
    };

    let colors = if args.randcolors {
        random_colors(6, &mut rng)
    } else if let Some(colors) = settings.colors.clone() {
        colors
    } else {
        preset_colors(algorithm, &mut rng)
    };

    let config = Config {
        width: args.width.unwrap_or(settings.width),
        height: args.height.unwrap_or(settings.height),
        algorithm,
        palette: Palette::new(colors)?,
    };

    let expr = match (&args.expr, args.random_expr) {
        (Some(text), _) => Some(
            text.parse::<Expr>()
                .with_context(|| format!("invalid expression {:?}", text))?,
        ),
        (None, true) => {
            let depth = settings
                .expression_depth
                .unwrap_or_else(|| rng.gen_range(5..10));
            Some(Expr::random(depth, &mut rng))
        }
        (None, false) => None,
    };

    let (grid, stem) = match &expr {
        Some(expr) => {
            info!(%expr, "expression");
            (generate_from_expression(&config, expr)?, "expr".to_string())
        }
        None => (generate(&config, &mut rng)?, algorithm.to_string()),
    };

    let path = args
        .output
        .or(settings.output.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(format!("{}.xpm", stem)));
    save(&path, &grid, &config.palette, png)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn save(path: &Path, grid: &Grid, palette: &Palette, png: bool) -> Result<()> {
    xpm::write(path, grid, palette).with_context(|| format!("failed to write {}", path.display()))?;
    println!("saved {}", path.display());

    if png {
        let png_path = path.with_extension("png");
        save_png(&png_path, grid, palette)
            .with_context(|| format!("failed to write {}", png_path.display()))?;
        println!("saved {}", png_path.display());
    }
    Ok(())
}

fn recolor_file(path: &Path, png: bool) -> Result<()> {
    let image = XpmImage::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (grid, palette) = image.to_grid()?;
    info!(
        path = %path.display(),
        colors = palette.len(),
        "recoloring (enter keeps a color)"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let palette = recolor(&palette, &mut stdin.lock(), &mut stdout)?;

    save(&recolored_path(path), &grid, &palette, png)
}
