
pub mod math;
pub mod grid;
pub mod config;
pub mod palette;
pub mod expression;
pub mod fractal;
pub mod patterns;
pub mod melting;
pub mod coral;
pub mod physarum;
pub mod metaball;
pub mod attractor;
pub mod dispatcher;
pub mod xpm;
pub mod image;
pub mod recolor;

pub use math::{C, hsv_to_hex};
pub use grid::{DoubleBuffer, Grid};
pub use config::{Algorithm, Config, ConfigError, Palette, Settings};
pub use expression::{Expr, ParseError};
pub use dispatcher::{Recipe, Seeds, generate, generate_from_expression, generate_with_seeds};
pub use xpm::{XpmError, XpmImage, to_xpm};
pub use self::image::{ExportError, save_png};
pub use recolor::recolor;
