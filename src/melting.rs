//! Cyclic cellular automaton. Colors creep forward one palette step at a
//! time wherever a neighbour is already ahead, which reads as melting wax.

use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::grid::{DoubleBuffer, Grid, wrap};

/// Neighbours that must already hold the next color before a cell advances.
pub const THRESHOLD: usize = 1;

pub struct MeltingSim {
    cells: DoubleBuffer<usize>,
    palette_len: usize,
    threshold: usize,
}

impl MeltingSim {
    /// Uniformly random starting colors.
    pub fn new<R: Rng + ?Sized>(width: usize, height: usize, palette_len: usize, rng: &mut R) -> Self {
        let cells = (0..width * height).map(|_| rng.gen_range(0..palette_len)).collect();
        Self::from_cells(width, height, palette_len, cells)
    }

    /// Start from a preset grid.
    pub fn from_grid(grid: &Grid, palette_len: usize) -> Self {
        Self::from_cells(grid.width(), grid.height(), palette_len, grid.cells().to_vec())
    }

    fn from_cells(width: usize, height: usize, palette_len: usize, cells: Vec<usize>) -> Self {
        MeltingSim {
            cells: DoubleBuffer::from_cells(width, height, cells),
            palette_len,
            threshold: THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// One generation. Every cell reads the previous generation only.
    pub fn step(&mut self) {
        let (width, height) = (self.cells.width(), self.cells.height());
        let (palette_len, threshold) = (self.palette_len, self.threshold);
        let (current, next) = self.cells.split();

        next.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let value = current[y * width + x];
                let candidate = (value + 1) % palette_len;
                let mut ahead = 0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let ny = wrap(y, dy, height);
                        let nx = wrap(x, dx, width);
                        if current[ny * width + nx] == candidate {
                            ahead += 1;
                        }
                    }
                }
                *out = if ahead >= threshold { candidate } else { value };
            }
        });

        self.cells.swap();
    }

    pub fn grid(&self) -> Grid {
        Grid::from_cells(self.cells.width(), self.cells.height(), self.cells.current().to_vec())
            .unwrap_or_else(|| Grid::new(self.cells.width(), self.cells.height()))
    }
}

/// Random start, then 50 to 149 generations.
pub fn run<R: Rng + ?Sized>(width: usize, height: usize, palette_len: usize, rng: &mut R) -> Grid {
    let mut sim = MeltingSim::new(width, height, palette_len, rng);
    let generations = rng.gen_range(50..150);
    debug!(generations, "melting");
    for _ in 0..generations {
        sim.step();
    }
    sim.grid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn single_color_grid_is_a_fixed_point() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut sim = MeltingSim::new(6, 5, 1, &mut rng);
        let before = sim.grid();
        assert!(before.cells().iter().all(|&c| c == 0));
        for _ in 0..10 {
            sim.step();
        }
        assert_eq!(sim.grid(), before);
    }

    #[test]
    fn uniform_grid_without_leaders_stays_put() {
        let start = Grid::filled(4, 4, 0);
        let mut sim = MeltingSim::from_grid(&start, 2);
        sim.step();
        assert_eq!(sim.grid(), start);
    }

    #[test]
    fn one_leader_pulls_its_neighbourhood_forward() {
        let mut start = Grid::filled(5, 5, 0);
        start.set(2, 2, 1);
        let mut sim = MeltingSim::from_grid(&start, 3);
        sim.step();
        let g = sim.grid();
        for y in 0..5usize {
            for x in 0..5usize {
                let near = x.abs_diff(2) <= 1 && y.abs_diff(2) <= 1;
                let expected = match (x, y) {
                    (2, 2) => 1, // nobody holds 2 yet
                    _ if near => 1,
                    _ => 0,
                };
                assert_eq!(g.get(x, y), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn neighbours_wrap_around_edges() {
        let mut start = Grid::filled(4, 4, 0);
        start.set(0, 0, 1);
        let mut sim = MeltingSim::from_grid(&start, 2);
        sim.step();
        let g = sim.grid();
        assert_eq!(g.get(3, 3), 1);
        assert_eq!(g.get(3, 0), 1);
        assert_eq!(g.get(2, 2), 0);
        // with two colors the leader's candidate is 0, which all its neighbours hold
        assert_eq!(g.get(0, 0), 0);
    }

    #[test]
    fn higher_threshold_needs_more_leaders() {
        let mut start = Grid::filled(5, 5, 0);
        start.set(2, 2, 1);
        let mut sim = MeltingSim::from_grid(&start, 3).with_threshold(2);
        sim.step();
        assert_eq!(sim.grid().get(1, 1), 0);
    }

    #[test]
    fn run_stays_in_palette() {
        let mut rng = StdRng::seed_from_u64(12);
        let grid = run(12, 9, 4, &mut rng);
        assert_eq!((grid.width(), grid.height()), (12, 9));
        assert!(grid.cells().iter().all(|&c| c < 4));
    }
}
