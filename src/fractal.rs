use crate::math::C;

/// Iteration cap shared by both escape-time sets.
pub const MAX_ITER: u32 = 50;

/// Steps of `z ← z² + c` from `z = 0` until `|z|² ≥ 4`, capped at `max_iter`.
pub fn mandelbrot_escapes(c: C, max_iter: u32) -> u32 {
    julia_escapes(C::new(0.0, 0.0), c, max_iter)
}

/// Steps of `z ← z² + c` from `z0` until `|z|² ≥ 4`, capped at `max_iter`.
pub fn julia_escapes(z0: C, c: C, max_iter: u32) -> u32 {
    let mut z = z0;
    let mut i = 0;
    while i < max_iter && z.abs_sq() < 4.0 {
        z = z.mul(z).add(c);
        i += 1;
    }
    i
}

/// Index 0 is the interior; escaped points cycle through `1..palette_len`.
pub fn escape_index(iter: u32, max_iter: u32, color_offset: usize, palette_len: usize) -> usize {
    if iter >= max_iter {
        return 0;
    }
    ((iter as usize + color_offset) % (palette_len - 1)) + 1
}

/// Sampling window for the classic set. `zoom` in `[0.5, 1.5)` narrows the
/// window and drifts it right as it grows.
pub fn mandelbrot_point(x: usize, y: usize, width: usize, height: usize, zoom: f64) -> C {
    let scale_x = 3.5 / zoom;
    let scale_y = 2.0 / zoom;
    let offset_x = -2.5 + (1.0 - 1.0 / zoom);
    C::new(
        x as f64 / width as f64 * scale_x + offset_x,
        y as f64 / height as f64 * scale_y - scale_y / 2.0,
    )
}

/// Fixed `[-1.5, 1.5]²` window for Julia sets.
pub fn julia_point(x: usize, y: usize, width: usize, height: usize) -> C {
    C::new(
        x as f64 / width as f64 * 3.0 - 1.5,
        y as f64 / height as f64 * 3.0 - 1.5,
    )
}

pub fn mandelbrot(x: usize, y: usize, width: usize, height: usize, zoom: f64, color_offset: usize, palette_len: usize) -> usize {
    let c = mandelbrot_point(x, y, width, height, zoom);
    escape_index(mandelbrot_escapes(c, MAX_ITER), MAX_ITER, color_offset, palette_len)
}

pub fn julia(x: usize, y: usize, width: usize, height: usize, c: C, color_offset: usize, palette_len: usize) -> usize {
    let z0 = julia_point(x, y, width, height);
    escape_index(julia_escapes(z0, c, MAX_ITER), MAX_ITER, color_offset, palette_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_with_zero_constant_never_escapes() {
        // the Julia window is centred on 0 for even sizes
        assert_eq!(julia_point(10, 10, 20, 20), C::new(0.0, 0.0));
        for offset in [0, 3, 17] {
            assert_eq!(julia(10, 10, 20, 20, C::new(0.0, 0.0), offset, 6), 0);
        }
    }

    #[test]
    fn far_points_escape_immediately() {
        assert_eq!(mandelbrot_escapes(C::new(3.0, 3.0), MAX_ITER), 1);
        assert_eq!(julia_escapes(C::new(2.0, 0.0), C::new(0.0, 0.0), MAX_ITER), 0);
    }

    #[test]
    fn escaped_points_avoid_interior_index() {
        for iter in 0..MAX_ITER {
            for offset in 0..4 {
                let idx = escape_index(iter, MAX_ITER, offset, 4);
                assert!((1..4).contains(&idx));
            }
        }
        assert_eq!(escape_index(MAX_ITER, MAX_ITER, 2, 4), 0);
    }

    #[test]
    fn two_color_palette_is_binary_mask() {
        assert_eq!(escape_index(7, MAX_ITER, 5, 2), 1);
    }

    #[test]
    fn cardioid_centre_is_interior() {
        // c = -0.5 sits inside the main cardioid
        assert_eq!(mandelbrot_escapes(C::new(-0.5, 0.0), MAX_ITER), MAX_ITER);
    }
}
