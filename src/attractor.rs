//! Clifford attractor rendered as a log-scaled density histogram.

use rand::Rng;
use tracing::{debug, warn};

use crate::grid::Grid;

pub const SEARCH_ATTEMPTS: usize = 100;
pub const SEARCH_STEPS: usize = 1000;
pub const TRANSIENT: usize = 100;
/// Minimum extent, in both axes, of a trajectory worth rendering.
pub const MIN_SPREAD: f64 = 0.5;
pub const ITERATIONS: usize = 5_000_000;
/// Half-width of the square window mapped onto the grid.
pub const WINDOW: f64 = 2.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Params {
    /// A set known to be chaotic, used when the search comes up empty.
    pub const FALLBACK: Params = Params {
        a: -1.4,
        b: 1.6,
        c: 1.0,
        d: 0.7,
    };

    #[inline]
    pub fn step(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (self.a * y).sin() + self.c * (self.a * x).cos(),
            (self.b * x).sin() + self.d * (self.b * y).cos(),
        )
    }

    /// Run from the origin and report whether the orbit stays finite and,
    /// past the transient, covers more than [`MIN_SPREAD`] in both axes.
    pub fn spreads(&self) -> bool {
        let (mut x, mut y) = (0.0, 0.0);
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for i in 0..SEARCH_STEPS {
            (x, y) = self.step(x, y);
            if !x.is_finite() || !y.is_finite() {
                return false;
            }
            if i > TRANSIENT {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
        max_x - min_x > MIN_SPREAD && max_y - min_y > MIN_SPREAD
    }
}

/// Draw parameters from `[-2, 2]⁴` until one spreads, or fall back.
pub fn search<R: Rng + ?Sized>(rng: &mut R) -> Params {
    for attempt in 0..SEARCH_ATTEMPTS {
        let params = Params {
            a: rng.gen_range(-2.0..=2.0),
            b: rng.gen_range(-2.0..=2.0),
            c: rng.gen_range(-2.0..=2.0),
            d: rng.gen_range(-2.0..=2.0),
        };
        if params.spreads() {
            debug!(attempt, ?params, "attractor parameters found");
            return params;
        }
    }
    warn!("no spreading attractor found, using fallback parameters");
    Params::FALLBACK
}

/// Visit counts per cell, row-major.
pub fn accumulate(params: &Params, iterations: usize, width: usize, height: usize) -> Vec<u64> {
    let mut density = vec![0u64; width * height];
    let (w, h) = (width as f64, height as f64);
    let (mut x, mut y) = (0.0, 0.0);
    for _ in 0..iterations {
        (x, y) = params.step(x, y);
        let sx = ((x + WINDOW) / (2.0 * WINDOW) * w).floor();
        let sy = ((y + WINDOW) / (2.0 * WINDOW) * h).floor();
        if sx >= 0.0 && sx < w && sy >= 0.0 && sy < h {
            density[sy as usize * width + sx as usize] += 1;
        }
    }
    density
}

/// `log(d) / log(max)` scaled to the palette. Empty cells stay 0 and the
/// densest cell lands on the last color.
pub fn tone_map(density: &[u64], palette_len: usize) -> Vec<usize> {
    let max = density.iter().copied().max().unwrap_or(0);
    let log_max = (max as f64).ln();
    let top = palette_len - 1;
    density
        .iter()
        .map(|&d| match d {
            0 => 0,
            // every visited cell ties for the max
            _ if max <= 1 => top,
            _ => (((d as f64).ln() / log_max * palette_len as f64) as usize).min(top),
        })
        .collect()
}

pub fn run<R: Rng + ?Sized>(width: usize, height: usize, palette_len: usize, rng: &mut R) -> Grid {
    let params = search(rng);
    let density = accumulate(&params, ITERATIONS, width, height);
    let cells = tone_map(&density, palette_len);
    Grid::from_cells(width, height, cells).unwrap_or_else(|| Grid::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn fallback_parameters_spread() {
        assert!(Params::FALLBACK.spreads());
    }

    #[test]
    fn collapsed_orbit_is_rejected() {
        // a = b = 0 pins the orbit to (c, d)
        let still = Params { a: 0.0, b: 0.0, c: 1.0, d: 1.0 };
        assert!(!still.spreads());
    }

    #[test]
    fn search_returns_a_spreading_set() {
        let mut rng = StdRng::seed_from_u64(77);
        assert!(search(&mut rng).spreads());
    }

    #[test]
    fn tone_map_endpoints() {
        let density = [0, 1, 10, 100, 1000];
        let mapped = tone_map(&density, 6);
        assert_eq!(mapped[0], 0);
        assert_eq!(mapped[4], 5);
        assert_eq!(mapped[1], 0); // log(1) == 0
        assert!(mapped.windows(2).skip(1).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn tone_map_single_visit_maximum() {
        assert_eq!(tone_map(&[0, 1, 1], 4), vec![0, 3, 3]);
        assert_eq!(tone_map(&[0, 0], 4), vec![0, 0]);
    }

    #[test]
    fn accumulated_hits_stay_in_window() {
        let density = accumulate(&Params::FALLBACK, 20_000, 32, 24);
        assert_eq!(density.len(), 32 * 24);
        // the orbit is bounded by |c| + 1 and |d| + 1, well inside the window
        assert_eq!(density.iter().sum::<u64>(), 20_000);
        let mapped = tone_map(&density, 6);
        let max = *density.iter().max().unwrap();
        for (d, i) in density.iter().zip(&mapped) {
            if *d == 0 {
                assert_eq!(*i, 0);
            }
            if *d == max {
                assert_eq!(*i, 5);
            }
        }
    }
}
