//! Bilaterally symmetric creatures: metaball bodies with neotenic faces,
//! bunnies with stacked-ball ears, and drippy Rorschach blobs.

use rand::Rng;
use tracing::debug;

use crate::grid::Grid;

pub const BACKGROUND: usize = 0;
pub const BODY: usize = 1;
pub const EYE: usize = 2;
/// Eye marker used by the Rorschach creature.
pub const CREATURE_EYE: usize = 5;
/// Field value above which a pixel belongs to the body.
pub const THRESHOLD: f64 = 1.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metaball {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Metaball {
    /// This ball reflected across the vertical centre line of a `width`-wide image.
    pub fn mirrored(&self, width: usize) -> Metaball {
        Metaball {
            x: width as f64 - self.x,
            ..*self
        }
    }
}

/// `Σ r² / max(d², 1)` at `(x, y)`.
pub fn field(balls: &[Metaball], x: f64, y: f64) -> f64 {
    balls
        .iter()
        .map(|b| {
            let d2 = (x - b.x) * (x - b.x) + (y - b.y) * (y - b.y);
            b.r * b.r / d2.max(1.0)
        })
        .sum()
}

/// Vertical extent of a rendered body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub top: usize,
    pub bottom: usize,
}

impl Extent {
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }
}

/// Threshold the field into [`BODY`] pixels. Only the left half (plus the
/// middle column of odd widths) is sampled, at pixel centres; the right half
/// is its mirror image so the mask is exactly symmetric.
pub fn rasterize(balls: &[Metaball], width: usize, height: usize) -> (Grid, Option<Extent>) {
    let mut grid = Grid::new(width, height);
    let mut extent: Option<Extent> = None;
    let half = width.div_ceil(2);

    for y in 0..height {
        for x in 0..half {
            if field(balls, x as f64 + 0.5, y as f64 + 0.5) > THRESHOLD {
                grid.set(x, y, BODY);
                grid.set(width - 1 - x, y, BODY);
                extent = Some(match extent {
                    None => Extent { top: y, bottom: y },
                    Some(e) => Extent { top: e.top.min(y), bottom: e.bottom.max(y) },
                });
            }
        }
    }
    (grid, extent)
}

/// Filled disk of `EYE` pixels, clipped to the grid.
fn draw_disk(grid: &mut Grid, cx: isize, cy: isize, r: isize, color: usize) {
    for y in cy - r..=cy + r {
        for x in cx - r..=cx + r {
            let inside = (x - cx) * (x - cx) + (y - cy) * (y - cy) <= r * r;
            if inside && x >= 0 && y >= 0 && (x as usize) < grid.width() && (y as usize) < grid.height() {
                grid.set(x as usize, y as usize, color);
            }
        }
    }
}

/// Face proportions, as fractions of the body extent and image width.
struct Face {
    /// Eye row, as a fraction of body height below its top.
    eye_drop: f64,
    spacing: f64,
    radius: f64,
}

/// Two eyes mirrored about the centre line.
fn draw_eyes(grid: &mut Grid, extent: Extent, face: &Face) {
    let width = grid.width();
    let eye_y = extent.top + (extent.height() as f64 * face.eye_drop) as usize;
    let spacing = (width as f64 * face.spacing) as usize;
    let radius = ((width as f64 * face.radius) as usize).max(1);

    let left = (width / 2) as isize - spacing as isize;
    let right = (width - 1) as isize - left;
    for cx in [left, right] {
        draw_disk(grid, cx, eye_y as isize, radius as isize, EYE);
    }
}

/// Place `count` ball pairs inside a band of the image, mirrored across the centre.
fn spawn_body<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    count: usize,
    (band_top, band_height): (f64, f64),
    (min_r, max_r): (f64, f64),
    rng: &mut R,
) -> Vec<Metaball> {
    let (w, h) = (width as f64, height as f64);
    let center_x = w / 2.0;
    let spawn_width = w * 0.4;
    let mut balls = Vec::with_capacity(count * 2);
    for _ in 0..count {
        let ball = Metaball {
            x: center_x - spawn_width / 2.0 + rng.r#gen::<f64>() * spawn_width,
            y: h * band_top + rng.r#gen::<f64>() * h * band_height,
            r: w * min_r + rng.r#gen::<f64>() * w * (max_r - min_r),
        };
        balls.push(ball);
        balls.push(ball.mirrored(width));
    }
    balls
}

/// A round metaball body with big, low-set, wide eyes.
pub fn cute<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Grid {
    let hearts = rng.gen_range(3..6);
    let balls = spawn_body(width, height, hearts, (0.2, 0.6), (0.05, 0.15), rng);
    debug!(balls = balls.len(), "cute body");

    let (mut grid, extent) = rasterize(&balls, width, height);
    let Some(extent) = extent else {
        return grid;
    };
    draw_eyes(
        &mut grid,
        extent,
        &Face {
            eye_drop: 0.45,
            spacing: 0.12,
            radius: 0.03,
        },
    );
    grid
}

/// A lower, chunkier body plus two ears of 3 to 5 stacked balls each.
pub fn cute_bunny<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Grid {
    let w = width as f64;
    let parts = rng.gen_range(3..6);
    let mut balls = spawn_body(width, height, parts, (0.4, 0.4), (0.08, 0.18), rng);

    let ear_len = rng.gen_range(3..6);
    let ear_base_x = w / 2.0 - w * 0.15;
    let ear_base_y = height as f64 * 0.4;
    let ear_r = w * 0.06;
    for i in 0..ear_len {
        // each ball climbs and leans outward a little
        let ear = Metaball {
            x: ear_base_x - i as f64 * ear_r * 0.2,
            y: ear_base_y - i as f64 * ear_r * 1.5,
            r: ear_r,
        };
        balls.push(ear);
        balls.push(ear.mirrored(width));
    }
    debug!(balls = balls.len(), ear_len, "bunny body");

    let (mut grid, extent) = rasterize(&balls, width, height);
    let Some(extent) = extent else {
        return grid;
    };
    // ears take roughly the top 30%, the eyes sit a fifth further down
    draw_eyes(
        &mut grid,
        extent,
        &Face {
            eye_drop: 0.5,
            spacing: 0.14,
            radius: 0.025,
        },
    );
    grid
}

/// Rorschach blot: noisy blobs drawn on the left half, dripped downward,
/// given a few 2×2 eyes, then folded onto the right half.
pub fn creature<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Grid {
    let mut grid = Grid::new(width, height);
    let center_x = width / 2;
    if center_x == 0 {
        return grid;
    }

    let blobs = rng.gen_range(5..15);
    for _ in 0..blobs {
        let cx = center_x as isize + rng.gen_range(-10..10);
        let cy = if height > 20 {
            rng.gen_range(10..height - 10) as isize
        } else {
            rng.gen_range(0..height) as isize
        };
        let radius = rng.gen_range(5..25) as f64;
        let color = rng.gen_range(1..4);

        for y in 0..height {
            for x in 0..center_x {
                let (dx, dy) = (x as isize - cx, y as isize - cy);
                let dist = ((dx * dx + dy * dy) as f64).sqrt();
                if dist < radius + rng.gen_range(0.0..5.0) {
                    grid.set(x, y, color);
                }
            }
        }
    }

    let drip_rows = height.saturating_sub(10).max(1);
    for _ in 0..500 {
        let x = rng.gen_range(0..center_x);
        let y = rng.gen_range(0..drip_rows);
        let color = grid.get(x, y);
        if color != BACKGROUND {
            let length = rng.gen_range(0..20);
            for d in 0..length {
                if y + d < height {
                    grid.set(x, y + d, color);
                }
            }
        }
    }

    let eyes = rng.gen_range(1..4);
    let eye_cols = center_x.saturating_sub(5).max(1);
    let eye_rows = (height / 2).max(1);
    for _ in 0..eyes {
        let ex = rng.gen_range(0..eye_cols);
        let ey = rng.gen_range(0..eye_rows) + 10;
        // a 2x2 marker has to fit and start on the blot
        if ex + 1 < center_x && ey + 1 < height && grid.get(ex, ey) != BACKGROUND {
            for (x, y) in [(ex, ey), (ex + 1, ey), (ex, ey + 1), (ex + 1, ey + 1)] {
                grid.set(x, y, CREATURE_EYE);
            }
        }
    }

    for y in 0..height {
        for x in 0..center_x {
            let v = grid.get(x, y);
            grid.set(width - 1 - x, y, v);
        }
    }
    grid
}
