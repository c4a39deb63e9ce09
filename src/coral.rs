//! Gray-Scott reaction-diffusion tuned for branching coral growth.

use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::grid::{DoubleBuffer, Grid, wrap};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
    pub feed: f64,
    pub kill: f64,
    pub diff_a: f64,
    pub diff_b: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            feed: 0.0545,
            kill: 0.062,
            diff_a: 1.0,
            diff_b: 0.5,
        }
    }
}

pub const STEPS: usize = 1000;
/// Share of cells seeded with activator.
pub const SEED_DENSITY: f64 = 0.10;

/// Laplacian weights, indexed `[dy + 1][dx + 1]`. They sum to zero.
const KERNEL: [[f64; 3]; 3] = [
    [0.05, 0.2, 0.05],
    [0.2, -1.0, 0.2],
    [0.05, 0.2, 0.05],
];

pub struct CoralSim {
    a: DoubleBuffer<f64>,
    b: DoubleBuffer<f64>,
    params: Params,
}

impl CoralSim {
    /// Substrate everywhere, activator sprinkled over roughly a tenth of the cells.
    pub fn new<R: Rng + ?Sized>(width: usize, height: usize, params: Params, rng: &mut R) -> Self {
        let seeds = (0..width * height)
            .map(|_| if rng.gen_bool(SEED_DENSITY) { 1.0 } else { 0.0 })
            .collect();
        CoralSim {
            a: DoubleBuffer::new(width, height, 1.0),
            b: DoubleBuffer::from_cells(width, height, seeds),
            params,
        }
    }

    pub fn a(&self) -> &[f64] {
        self.a.current()
    }

    pub fn b(&self) -> &[f64] {
        self.b.current()
    }

    pub fn step(&mut self) {
        let (width, height) = (self.a.width(), self.a.height());
        let p = self.params;
        let (a, next_a) = self.a.split();
        let (b, next_b) = self.b.split();

        next_a
            .par_chunks_mut(width)
            .zip(next_b.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (row_a, row_b))| {
                for x in 0..width {
                    let mut lap_a = 0.0;
                    let mut lap_b = 0.0;
                    for (ky, weights) in KERNEL.iter().enumerate() {
                        let ny = wrap(y, ky as isize - 1, height);
                        for (kx, weight) in weights.iter().enumerate() {
                            let i = ny * width + wrap(x, kx as isize - 1, width);
                            lap_a += a[i] * weight;
                            lap_b += b[i] * weight;
                        }
                    }

                    let i = y * width + x;
                    let (av, bv) = (a[i], b[i]);
                    let abb = av * bv * bv;
                    let new_a = av + p.diff_a * lap_a - abb + p.feed * (1.0 - av);
                    let new_b = bv + p.diff_b * lap_b + abb - (p.kill + p.feed) * bv;
                    row_a[x] = new_a.clamp(0.0, 1.0);
                    row_b[x] = new_b.clamp(0.0, 1.0);
                }
            });

        self.a.swap();
        self.b.swap();
    }

    /// Activator concentration as palette indices. Faint background below
    /// 0.05 (after a 2.5x boost) is dropped to 0.
    pub fn grid(&self, palette_len: usize) -> Grid {
        let (width, height) = (self.b.width(), self.b.height());
        let cells = self
            .b
            .current()
            .iter()
            .map(|&v| {
                let mut v = v * 2.5;
                if v < 0.05 {
                    v = 0.0;
                }
                ((v.min(1.0) * palette_len as f64) as usize).min(palette_len - 1)
            })
            .collect();
        Grid::from_cells(width, height, cells).unwrap_or_else(|| Grid::new(width, height))
    }
}

pub fn run<R: Rng + ?Sized>(width: usize, height: usize, palette_len: usize, rng: &mut R) -> Grid {
    let mut sim = CoralSim::new(width, height, Params::default(), rng);
    debug!(steps = STEPS, "growing coral");
    for _ in 0..STEPS {
        sim.step();
    }
    sim.grid(palette_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn kernel_conserves_mass() {
        let total: f64 = KERNEL.iter().flatten().sum();
        assert!(total.abs() < 1e-12);
    }

    #[test]
    fn fields_stay_in_unit_interval_every_step() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut sim = CoralSim::new(24, 18, Params::default(), &mut rng);
        for step in 0..STEPS {
            sim.step();
            let in_range = |v: &f64| (0.0..=1.0).contains(v);
            assert!(sim.a().iter().all(in_range), "A left [0,1] at step {step}");
            assert!(sim.b().iter().all(in_range), "B left [0,1] at step {step}");
        }
    }

    #[test]
    fn seeding_is_roughly_ten_percent() {
        let mut rng = StdRng::seed_from_u64(5);
        let sim = CoralSim::new(100, 100, Params::default(), &mut rng);
        let seeded = sim.b().iter().filter(|&&v| v == 1.0).count();
        assert!((700..1300).contains(&seeded), "{seeded}");
        assert!(sim.a().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn empty_activator_stays_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut sim = CoralSim::new(8, 8, Params::default(), &mut rng);
        sim.b.current_mut().fill(0.0);
        for _ in 0..20 {
            sim.step();
        }
        assert!(sim.b().iter().all(|&v| v == 0.0));
        assert!(sim.grid(14).cells().iter().all(|&i| i == 0));
    }

    #[test]
    fn grid_maps_saturated_activator_to_top_color() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut sim = CoralSim::new(2, 1, Params::default(), &mut rng);
        sim.b.current_mut().copy_from_slice(&[0.01, 0.9]);
        let g = sim.grid(10);
        assert_eq!(g.get(0, 0), 0);
        assert_eq!(g.get(1, 0), 9);
    }
}
