//! Stateless per-pixel formulas. Each one only needs the per-run offsets.

use rand::Rng;

/// Per-run shifts drawn once by the dispatcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offsets {
    pub x: usize,
    pub y: usize,
    pub color: usize,
}

pub fn noise<R: Rng + ?Sized>(palette_len: usize, rng: &mut R) -> usize {
    rng.gen_range(0..palette_len)
}

/// Munching squares: xor of the shifted coordinates.
pub fn xor(x: usize, y: usize, offsets: Offsets, palette_len: usize) -> usize {
    ((x + offsets.x) ^ (y + offsets.y)) % palette_len
}

/// Concentric rings around a centre pushed off the middle by the offsets.
pub fn circles(x: usize, y: usize, width: usize, height: usize, offsets: Offsets, palette_len: usize) -> usize {
    let (w, h) = (width as f64, height as f64);
    let cx = w / 2.0 + ((offsets.x % 100) as f64 / 50.0) * w * 0.5;
    let cy = h / 2.0 + ((offsets.y % 100) as f64 / 50.0) * h * 0.5;
    let thickness = 1.0 + (offsets.x % 10) as f64 / 2.0;
    let dist = (x as f64 - cx).hypot(y as f64 - cy);
    ((dist / thickness) as usize + offsets.color) % palette_len
}

/// Domain-warped sine interference with a gentle contrast curve.
pub fn pastel(x: usize, y: usize, offsets: Offsets, palette_len: usize) -> usize {
    const SCALE: f64 = 50.0;
    let dx = (x + offsets.x) as f64;
    let dy = (y + offsets.y) as f64;
    let warp_x = dx + 20.0 * (dy / 60.0).sin();
    let warp_y = dy + 20.0 * (dx / 60.0).cos();
    let h = (0.5 + 0.5 * ((warp_x + warp_y) / SCALE).sin()).powf(0.8);
    ((h * palette_len as f64) as usize).min(palette_len - 1)
}
