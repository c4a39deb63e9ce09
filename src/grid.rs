//! Index grids and the double-buffered arenas the simulations step through.

/// A `height × width` array of palette indices, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<usize>,
}

impl Grid {
    /// A grid filled with index 0.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, value: usize) -> Self {
        Grid {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Build a grid from a row-major cell vector. Returns `None` on a size mismatch.
    pub fn from_cells(width: usize, height: usize, cells: Vec<usize>) -> Option<Self> {
        (cells.len() == width * height).then_some(Grid { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> usize {
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: usize) {
        self.cells[y * self.width + x] = value;
    }

    pub fn row(&self, y: usize) -> &[usize] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        // chunks(0) panics, and a zero-width grid has no cells anyway
        self.cells.chunks(self.width.max(1))
    }

    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn max_index(&self) -> Option<usize> {
        self.cells.iter().copied().max()
    }

    pub fn into_rows(self) -> Vec<Vec<usize>> {
        self.rows().map(<[usize]>::to_vec).collect()
    }
}

/// Two same-shape buffers with a swappable "current" side.
///
/// A step reads from [`DoubleBuffer::split`]'s first slice and writes the
/// second, then calls [`DoubleBuffer::swap`]. Nothing is copied between steps.
#[derive(Clone, Debug)]
pub struct DoubleBuffer<T> {
    width: usize,
    height: usize,
    buffers: [Vec<T>; 2],
    current: usize,
}

impl<T: Copy> DoubleBuffer<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        DoubleBuffer {
            width,
            height,
            buffers: [vec![fill; width * height], vec![fill; width * height]],
            current: 0,
        }
    }

    /// Seed the current buffer from an existing row-major vector.
    pub fn from_cells(width: usize, height: usize, cells: Vec<T>) -> Self {
        assert_eq!(cells.len(), width * height, "cell count must match dimensions");
        let next = cells.clone();
        DoubleBuffer {
            width,
            height,
            buffers: [cells, next],
            current: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn current(&self) -> &[T] {
        &self.buffers[self.current]
    }

    pub fn current_mut(&mut self) -> &mut [T] {
        &mut self.buffers[self.current]
    }

    /// (read-only current, writable next)
    pub fn split(&mut self) -> (&[T], &mut [T]) {
        let [first, second] = &mut self.buffers;
        if self.current == 0 {
            (first.as_slice(), second.as_mut_slice())
        } else {
            (second.as_slice(), first.as_mut_slice())
        }
    }

    pub fn swap(&mut self) {
        self.current ^= 1;
    }
}

/// Toroidal neighbour index: `(v + delta) mod len`, for any signed delta.
#[inline]
pub fn wrap(v: usize, delta: isize, len: usize) -> usize {
    (v as isize + delta).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_row_major_layout() {
        let grid = Grid::from_cells(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(grid.row(1), &[3, 4, 5]);
        assert_eq!(grid.get(2, 0), 2);
        assert_eq!(grid.into_rows(), vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn from_cells_rejects_wrong_length() {
        assert!(Grid::from_cells(2, 2, vec![0; 3]).is_none());
    }

    #[test]
    fn swap_flips_read_and_write_sides() {
        let mut buf = DoubleBuffer::new(2, 1, 0.0_f64);
        {
            let (read, write) = buf.split();
            assert_eq!(read, &[0.0, 0.0]);
            write.copy_from_slice(&[1.0, 2.0]);
        }
        assert_eq!(buf.current(), &[0.0, 0.0]);
        buf.swap();
        assert_eq!(buf.current(), &[1.0, 2.0]);
    }

    #[test]
    fn wrap_is_toroidal() {
        assert_eq!(wrap(0, -1, 5), 4);
        assert_eq!(wrap(4, 1, 5), 0);
        assert_eq!(wrap(2, -7, 5), 0);
    }
}
