//! XPM3 text images: writing generated grids and reading them back.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, Palette};
use crate::grid::Grid;

#[derive(Debug, Error)]
pub enum XpmError {
    #[error("failed to access XPM file: {0}")]
    Io(#[from] io::Error),
    #[error("no quoted XPM data found")]
    Empty,
    #[error("invalid XPM header: {0:?}")]
    Header(String),
    #[error("palette ended after {found} of {expected} entries")]
    ShortPalette { expected: usize, found: usize },
    #[error("could not parse palette entry {0:?}")]
    Entry(String),
    #[error("expected {expected} pixel rows, found {found}")]
    ShortPixels { expected: usize, found: usize },
    #[error(transparent)]
    Palette(#[from] ConfigError),
}

/// Render `grid` as XPM source. Rows and palette entries appear in index order.
pub fn to_xpm(grid: &Grid, palette: &Palette) -> String {
    let cpp = palette
        .symbols
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(1);
    let mut out = String::with_capacity(64 + palette.len() * 16 + grid.height() * (grid.width() * cpp + 4));
    out.push_str("/* XPM */\n");
    out.push_str("static char * texture[] = {\n");
    out.push_str(&format!(
        "\"{} {} {} {}\",\n",
        grid.width(),
        grid.height(),
        palette.len(),
        cpp
    ));
    for (symbol, color) in palette.symbols.iter().zip(&palette.colors) {
        out.push_str(&format!("\"{} c {}\",\n", symbol, color));
    }
    for row in grid.rows() {
        out.push('"');
        for &index in row {
            // generators never emit indices outside the palette
            let symbol = palette.symbols.get(index).unwrap_or(&palette.symbols[0]);
            out.push_str(symbol);
        }
        out.push_str("\",\n");
    }
    out.push_str("};\n");
    out
}

pub fn write(path: &Path, grid: &Grid, palette: &Palette) -> Result<(), XpmError> {
    fs::write(path, to_xpm(grid, palette))?;
    debug!(path = %path.display(), "wrote xpm");
    Ok(())
}

/// A parsed XPM file, still in textual form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XpmImage {
    pub width: usize,
    pub height: usize,
    pub chars_per_pixel: usize,
    pub symbols: Vec<String>,
    pub colors: Vec<String>,
    pub rows: Vec<String>,
}

/// The contents of the first non-empty `"..."` on a line.
fn quoted(line: &str) -> Option<&str> {
    let mut rest = line;
    while let Some(start) = rest.find('"') {
        let after = &rest[start + 1..];
        let end = after.find('"')?;
        if end > 0 {
            return Some(&after[..end]);
        }
        rest = &after[end + 1..];
    }
    None
}

/// Split `"<sym> c <color>"`, falling back to the last whitespace field.
fn parse_entry(entry: &str, cpp: usize) -> Result<(String, String), XpmError> {
    let split = entry.char_indices().nth(cpp).map(|(i, _)| i);
    let Some(split) = split else {
        return Err(XpmError::Entry(entry.to_string()));
    };
    let (symbol, rest) = entry.split_at(split);
    let color = match rest.split_once("c ") {
        Some((_, color)) => color.trim(),
        None => {
            let fields: Vec<&str> = entry.split_whitespace().collect();
            if fields.len() < 2 {
                return Err(XpmError::Entry(entry.to_string()));
            }
            fields[fields.len() - 1]
        }
    };
    Ok((symbol.to_string(), color.to_string()))
}

impl XpmImage {
    pub fn parse(text: &str) -> Result<Self, XpmError> {
        let strings: Vec<&str> = text.lines().filter_map(quoted).collect();
        let (header, body) = strings.split_first().ok_or(XpmError::Empty)?;

        let values: Vec<usize> = header
            .split_whitespace()
            .take(4)
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| XpmError::Header(header.to_string()))?;
        let [width, height, ncolors, cpp] = values[..] else {
            return Err(XpmError::Header(header.to_string()));
        };
        if cpp == 0 {
            return Err(XpmError::Header(header.to_string()));
        }

        if body.len() < ncolors {
            return Err(XpmError::ShortPalette {
                expected: ncolors,
                found: body.len(),
            });
        }
        let (entries, pixels) = body.split_at(ncolors);
        let mut symbols = Vec::with_capacity(ncolors);
        let mut colors = Vec::with_capacity(ncolors);
        for entry in entries {
            let (symbol, color) = parse_entry(entry, cpp)?;
            symbols.push(symbol);
            colors.push(color);
        }

        if pixels.len() < height {
            return Err(XpmError::ShortPixels {
                expected: height,
                found: pixels.len(),
            });
        }
        let rows = pixels[..height].iter().map(|r| r.to_string()).collect();

        Ok(XpmImage {
            width,
            height,
            chars_per_pixel: cpp,
            symbols,
            colors,
            rows,
        })
    }

    pub fn read(path: &Path) -> Result<Self, XpmError> {
        let text = fs::read_to_string(path)?;
        let image = Self::parse(&text)?;
        debug!(
            path = %path.display(),
            width = image.width,
            height = image.height,
            colors = image.colors.len(),
            "read xpm"
        );
        Ok(image)
    }

    /// Resolve every pixel to its palette index. Unknown symbols and short
    /// rows fall back to index 0.
    pub fn to_grid(&self) -> Result<(Grid, Palette), XpmError> {
        let palette = Palette::with_symbols(self.colors.clone(), self.symbols.clone())?;
        let mut grid = Grid::new(self.width, self.height);
        for (y, row) in self.rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            for (x, pixel) in chars.chunks(self.chars_per_pixel).take(self.width).enumerate() {
                let pixel: String = pixel.iter().collect();
                let index = self.symbols.iter().position(|s| *s == pixel).unwrap_or(0);
                grid.set(x, y, index);
            }
        }
        Ok((grid, palette))
    }
}
