//! Slime-mould transport networks: agents steer toward the trail they and
//! their neighbours leave behind.

use std::f64::consts::{FRAC_PI_4, TAU};

use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::grid::{DoubleBuffer, Grid, wrap};

pub const AGENT_DENSITY: f64 = 0.12;
pub const SENSOR_ANGLE: f64 = FRAC_PI_4;
pub const SENSOR_DIST: f64 = 4.0;
pub const TURN_ANGLE: f64 = FRAC_PI_4;
pub const DEPOSIT: f64 = 0.2;
pub const DECAY: f64 = 0.9;
pub const STEPS: usize = 500;
/// Trail below this is treated as empty when rendering.
pub const CUTOFF: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Steer {
    Straight,
    Wander,
    Left,
    Right,
}

/// Strongest reading wins; a weak centre means wander; ties lean right.
pub fn steer(left: f64, center: f64, right: f64) -> Steer {
    if center > left && center > right {
        Steer::Straight
    } else if center < left && center < right {
        Steer::Wander
    } else if left > right {
        Steer::Left
    } else {
        Steer::Right
    }
}

/// Wrap a position onto `[0, len)`.
fn wrap_coord(v: f64, len: f64) -> f64 {
    let v = v.rem_euclid(len);
    // rem_euclid rounds tiny negatives up to exactly len
    if v >= len { 0.0 } else { v }
}

pub struct PhysarumSim {
    agents: Vec<Agent>,
    trail: DoubleBuffer<f64>,
}

impl PhysarumSim {
    pub fn new<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Self {
        let count = (width as f64 * height as f64 * AGENT_DENSITY) as usize;
        let agents = (0..count)
            .map(|_| Agent {
                x: rng.gen_range(0.0..width as f64),
                y: rng.gen_range(0.0..height as f64),
                angle: rng.gen_range(0.0..TAU),
            })
            .collect();
        PhysarumSim {
            agents,
            trail: DoubleBuffer::new(width, height, 0.0),
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn trail(&self) -> &[f64] {
        self.trail.current()
    }

    fn sense(&self, agent: &Agent, offset: f64) -> f64 {
        let (width, height) = (self.trail.width(), self.trail.height());
        let angle = agent.angle + offset;
        let sx = agent.x + angle.cos() * SENSOR_DIST;
        let sy = agent.y + angle.sin() * SENSOR_DIST;
        // truncate toward zero, then wrap
        let ix = wrap(0, sx as isize, width);
        let iy = wrap(0, sy as isize, height);
        self.trail.current()[iy * width + ix]
    }

    /// Sense and move every agent against the trail as it stood at the start
    /// of the step, lay down their deposits, then diffuse and decay.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (width, height) = (self.trail.width(), self.trail.height());
        let (w, h) = (width as f64, height as f64);

        let mut landed = Vec::with_capacity(self.agents.len());
        for i in 0..self.agents.len() {
            let agent = self.agents[i];
            let left = self.sense(&agent, -SENSOR_ANGLE);
            let center = self.sense(&agent, 0.0);
            let right = self.sense(&agent, SENSOR_ANGLE);

            let mut angle = agent.angle;
            match steer(left, center, right) {
                Steer::Straight => {}
                Steer::Wander => angle += rng.gen_range(-TURN_ANGLE..=TURN_ANGLE),
                Steer::Left => angle -= TURN_ANGLE,
                Steer::Right => angle += TURN_ANGLE,
            }

            let x = wrap_coord(agent.x + angle.cos(), w);
            let y = wrap_coord(agent.y + angle.sin(), h);
            self.agents[i] = Agent { x, y, angle };
            landed.push((y as usize).min(height - 1) * width + (x as usize).min(width - 1));
        }

        // clamped adds commute, so deposit order does not matter
        let trail = self.trail.current_mut();
        for cell in landed {
            trail[cell] = (trail[cell] + DEPOSIT).min(1.0);
        }

        let (trail, next) = self.trail.split();
        next.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for dy in -1..=1 {
                    let ny = wrap(y, dy, height);
                    for dx in -1..=1 {
                        sum += trail[ny * width + wrap(x, dx, width)];
                    }
                }
                *out = sum / 9.0 * DECAY;
            }
        });
        self.trail.swap();
    }

    /// Keep only well-travelled paths, stretched back over the palette.
    pub fn grid(&self, palette_len: usize) -> Grid {
        let (width, height) = (self.trail.width(), self.trail.height());
        let cells = self
            .trail
            .current()
            .iter()
            .map(|&v| {
                let v = if v < CUTOFF { 0.0 } else { (v - CUTOFF) * 1.25 };
                ((v * palette_len as f64) as usize).min(palette_len - 1)
            })
            .collect();
        Grid::from_cells(width, height, cells).unwrap_or_else(|| Grid::new(width, height))
    }
}

pub fn run<R: Rng + ?Sized>(width: usize, height: usize, palette_len: usize, rng: &mut R) -> Grid {
    let mut sim = PhysarumSim::new(width, height, rng);
    debug!(agents = sim.agents.len(), steps = STEPS, "simulating physarum");
    for _ in 0..STEPS {
        sim.step(rng);
    }
    sim.grid(palette_len)
}
