use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Symbols handed out to palette entries, one character per color.
/// `"` and `\` are left out so every symbol is safe inside an XPM string.
pub const SYMBOL_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.#+@$%&*=-;:>,<'!~^/()[]{}|_`?";

/// Every generation algorithm the engine knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Noise,
    Xor,
    Circles,
    Pastel,
    Mandelbrot,
    Julia,
    Melting,
    Creature,
    Cute,
    CuteBunny,
    Physarum,
    Coral,
    Attractor,
}

impl Algorithm {
    pub const ALL: [Algorithm; 13] = [
        Algorithm::Noise,
        Algorithm::Xor,
        Algorithm::Circles,
        Algorithm::Pastel,
        Algorithm::Mandelbrot,
        Algorithm::Julia,
        Algorithm::Melting,
        Algorithm::Creature,
        Algorithm::Cute,
        Algorithm::CuteBunny,
        Algorithm::Physarum,
        Algorithm::Coral,
        Algorithm::Attractor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Noise => "noise",
            Algorithm::Xor => "xor",
            Algorithm::Circles => "circles",
            Algorithm::Pastel => "pastel",
            Algorithm::Mandelbrot => "mandelbrot",
            Algorithm::Julia => "julia",
            Algorithm::Melting => "melting",
            Algorithm::Creature => "creature",
            Algorithm::Cute => "cute",
            Algorithm::CuteBunny => "cutebunny",
            Algorithm::Physarum => "physarum",
            Algorithm::Coral => "coral",
            Algorithm::Attractor => "attractor",
        }
    }

    /// Smallest palette this algorithm can emit valid indices into.
    pub fn min_palette_len(self) -> usize {
        match self {
            // index 0 is reserved for the interior, escape colors cycle over the rest
            Algorithm::Mandelbrot | Algorithm::Julia => 2,
            // background, body, eyes
            Algorithm::Cute | Algorithm::CuteBunny => 3,
            // blob colors 1..=3 plus the eye marker at 5
            Algorithm::Creature => 6,
            _ => 1,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|algo| algo.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("algorithm '{algorithm}' needs at least {required} colors, palette has {actual}")]
    PaletteTooSmall {
        algorithm: &'static str,
        required: usize,
        actual: usize,
    },
    #[error("palette has {colors} colors but only {symbols} symbols")]
    NotEnoughSymbols { colors: usize, symbols: usize },
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
}

/// Ordered colors and the pixel-marker symbol assigned to each.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<String>,
    pub symbols: Vec<String>,
}

impl Palette {
    /// Assign single-character symbols from [`SYMBOL_ALPHABET`] in order.
    pub fn new<S: Into<String>>(colors: impl IntoIterator<Item = S>) -> Result<Self, ConfigError> {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        let symbols: Vec<String> = SYMBOL_ALPHABET
            .chars()
            .take(colors.len())
            .map(String::from)
            .collect();
        Self::with_symbols(colors, symbols)
    }

    pub fn with_symbols(colors: Vec<String>, symbols: Vec<String>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if symbols.len() < colors.len() {
            return Err(ConfigError::NotEnoughSymbols {
                colors: colors.len(),
                symbols: symbols.len(),
            });
        }
        Ok(Palette { colors, symbols })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// One generation run. Immutable once validated.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub algorithm: Algorithm,
    pub palette: Palette,
}

impl Config {
    pub fn new(
        width: usize,
        height: usize,
        algorithm: Algorithm,
        palette: Palette,
    ) -> Result<Self, ConfigError> {
        let config = Config {
            width,
            height,
            algorithm,
            palette,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.palette.symbols.len() < self.palette.len() {
            return Err(ConfigError::NotEnoughSymbols {
                colors: self.palette.len(),
                symbols: self.palette.symbols.len(),
            });
        }
        let required = self.algorithm.min_palette_len();
        if self.palette.len() < required {
            return Err(ConfigError::PaletteTooSmall {
                algorithm: self.algorithm.name(),
                required,
                actual: self.palette.len(),
            });
        }
        Ok(())
    }

    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }
}

/// Optional JSON settings file. Missing fields fall back to defaults and
/// command-line flags override whatever the file sets.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    pub algorithm: Option<Algorithm>,
    pub colors: Option<Vec<String>>,
    pub seed: Option<u64>,
    pub output: Option<String>,
    pub png: bool,
    pub expression_depth: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: 128,
            height: 128,
            algorithm: None,
            colors: None,
            seed: None,
            output: None,
            png: false,
            expression_depth: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(n: usize) -> Palette {
        Palette::new((0..n).map(|i| format!("#{:06X}", i))).unwrap()
    }

    #[test]
    fn algorithm_names_round_trip_through_from_str() {
        for algo in Algorithm::ALL {
            assert_eq!(algo.name().parse::<Algorithm>(), Ok(algo));
        }
        assert_eq!("CuteBunny".parse::<Algorithm>(), Ok(Algorithm::CuteBunny));
        assert!(matches!(
            "plasma".parse::<Algorithm>(),
            Err(ConfigError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn symbols_are_unique_single_characters() {
        let p = palette(40);
        assert_eq!(p.symbols.len(), 40);
        let mut seen = std::collections::HashSet::new();
        assert!(p.symbols.iter().all(|s| s.chars().count() == 1 && seen.insert(s.clone())));
        assert!(!SYMBOL_ALPHABET.contains('"') && !SYMBOL_ALPHABET.contains('\\'));
    }

    #[test]
    fn oversized_palette_runs_out_of_symbols() {
        let n = SYMBOL_ALPHABET.chars().count() + 1;
        let err = Palette::new((0..n).map(|i| format!("#{:06X}", i))).unwrap_err();
        assert!(matches!(err, ConfigError::NotEnoughSymbols { .. }));
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert_eq!(Palette::new(Vec::<String>::new()), Err(ConfigError::EmptyPalette));
    }

    #[test]
    fn fractals_need_two_colors() {
        let err = Config::new(8, 8, Algorithm::Julia, palette(1)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::PaletteTooSmall {
                algorithm: "julia",
                required: 2,
                actual: 1
            }
        );
        assert!(Config::new(8, 8, Algorithm::Julia, palette(2)).is_ok());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = Config::new(0, 8, Algorithm::Noise, palette(2)).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGrid { .. }));
    }

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"algorithm": "cutebunny", "seed": 7}"#).unwrap();
        assert_eq!(s.algorithm, Some(Algorithm::CuteBunny));
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.width, 128);
        assert!(!s.png);
    }
}
