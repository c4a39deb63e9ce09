//! Routes a validated [`Config`] to the generator for its algorithm.

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{Algorithm, Config, ConfigError};
use crate::expression::{self, Expr};
use crate::fractal;
use crate::grid::Grid;
use crate::math::C;
use crate::patterns::{self, Offsets};
use crate::{attractor, coral, melting, metaball, physarum};

/// Per-run random inputs shared by the stateless generators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seeds {
    pub offsets: Offsets,
    pub julia_c: C,
    pub zoom: f64,
}

impl Seeds {
    pub fn draw<R: Rng + ?Sized>(palette_len: usize, rng: &mut R) -> Self {
        let seeds = Seeds {
            offsets: Offsets {
                x: rng.gen_range(0..1000),
                y: rng.gen_range(0..1000),
                color: rng.gen_range(0..palette_len),
            },
            julia_c: C::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
            zoom: rng.gen_range(0.5..1.5),
        };
        debug!(?seeds, "drew per-run seeds");
        seeds
    }
}

/// One fully parameterised generation job.
#[derive(Clone, Debug, PartialEq)]
pub enum Recipe {
    Noise,
    Xor(Offsets),
    Circles(Offsets),
    Pastel(Offsets),
    Mandelbrot { zoom: f64, color_offset: usize },
    Julia { c: C, color_offset: usize },
    Melting,
    Creature,
    Cute,
    CuteBunny,
    Physarum,
    Coral,
    Attractor,
    Expression(Expr),
}

impl Recipe {
    /// Pick out the seeds `algorithm` actually uses.
    pub fn from_seeds(algorithm: Algorithm, seeds: &Seeds) -> Recipe {
        match algorithm {
            Algorithm::Noise => Recipe::Noise,
            Algorithm::Xor => Recipe::Xor(seeds.offsets),
            Algorithm::Circles => Recipe::Circles(seeds.offsets),
            Algorithm::Pastel => Recipe::Pastel(seeds.offsets),
            Algorithm::Mandelbrot => Recipe::Mandelbrot {
                zoom: seeds.zoom,
                color_offset: seeds.offsets.color,
            },
            Algorithm::Julia => Recipe::Julia {
                c: seeds.julia_c,
                color_offset: seeds.offsets.color,
            },
            Algorithm::Melting => Recipe::Melting,
            Algorithm::Creature => Recipe::Creature,
            Algorithm::Cute => Recipe::Cute,
            Algorithm::CuteBunny => Recipe::CuteBunny,
            Algorithm::Physarum => Recipe::Physarum,
            Algorithm::Coral => Recipe::Coral,
            Algorithm::Attractor => Recipe::Attractor,
        }
    }
}

/// Evaluate a pure per-pixel function, one rayon task per row.
fn per_pixel<F>(width: usize, height: usize, f: F) -> Grid
where
    F: Fn(usize, usize) -> usize + Sync,
{
    let mut cells = vec![0; width * height];
    cells.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = f(x, y);
        }
    });
    Grid::from_cells(width, height, cells).unwrap_or_else(|| Grid::new(width, height))
}

/// Run `recipe` against an already validated `config`.
pub fn execute<R: Rng + ?Sized>(config: &Config, recipe: &Recipe, rng: &mut R) -> Grid {
    let (w, h, n) = (config.width, config.height, config.palette_len());
    match recipe {
        Recipe::Noise => {
            let mut grid = Grid::new(w, h);
            for y in 0..h {
                for x in 0..w {
                    grid.set(x, y, patterns::noise(n, rng));
                }
            }
            grid
        }
        Recipe::Xor(offsets) => per_pixel(w, h, |x, y| patterns::xor(x, y, *offsets, n)),
        Recipe::Circles(offsets) => per_pixel(w, h, |x, y| patterns::circles(x, y, w, h, *offsets, n)),
        Recipe::Pastel(offsets) => per_pixel(w, h, |x, y| patterns::pastel(x, y, *offsets, n)),
        Recipe::Mandelbrot { zoom, color_offset } => {
            per_pixel(w, h, |x, y| fractal::mandelbrot(x, y, w, h, *zoom, *color_offset, n))
        }
        Recipe::Julia { c, color_offset } => {
            per_pixel(w, h, |x, y| fractal::julia(x, y, w, h, *c, *color_offset, n))
        }
        Recipe::Melting => melting::run(w, h, n, rng),
        Recipe::Creature => metaball::creature(w, h, rng),
        Recipe::Cute => metaball::cute(w, h, rng),
        Recipe::CuteBunny => metaball::cute_bunny(w, h, rng),
        Recipe::Physarum => physarum::run(w, h, n, rng),
        Recipe::Coral => coral::run(w, h, n, rng),
        Recipe::Attractor => attractor::run(w, h, n, rng),
        Recipe::Expression(expr) => expression::render(expr, w, h, n),
    }
}

/// Validate, draw fresh seeds and generate the configured algorithm.
pub fn generate<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<Grid, ConfigError> {
    config.validate()?;
    let seeds = Seeds::draw(config.palette_len(), rng);
    generate_with_seeds(config, &seeds, rng)
}

/// Like [`generate`] but with caller-chosen seeds.
pub fn generate_with_seeds<R: Rng + ?Sized>(
    config: &Config,
    seeds: &Seeds,
    rng: &mut R,
) -> Result<Grid, ConfigError> {
    config.validate()?;
    let recipe = Recipe::from_seeds(config.algorithm, seeds);
    info!(
        algorithm = %config.algorithm,
        width = config.width,
        height = config.height,
        colors = config.palette_len(),
        "generating"
    );
    let grid = execute(config, &recipe, rng);
    info!(algorithm = %config.algorithm, "generated");
    Ok(grid)
}

/// Paint `expr` over the configured grid. The algorithm tag is ignored; the
/// palette only has to be non-empty.
pub fn generate_from_expression(config: &Config, expr: &Expr) -> Result<Grid, ConfigError> {
    if config.width == 0 || config.height == 0 {
        return Err(ConfigError::EmptyGrid {
            width: config.width,
            height: config.height,
        });
    }
    if config.palette.is_empty() {
        return Err(ConfigError::EmptyPalette);
    }
    info!(%expr, depth = expr.depth(), "painting expression");
    Ok(expression::render(expr, config.width, config.height, config.palette_len()))
}
