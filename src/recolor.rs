//! Interactive palette editing for an existing XPM.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Palette;
use crate::palette::{TRANSPARENT, parse_color, swatch};

/// Normalize a typed color. `None` means the input is not a usable color.
pub fn normalize(input: &str) -> Option<String> {
    let input = input.trim();
    if input.eq_ignore_ascii_case(TRANSPARENT) {
        return Some(TRANSPARENT.to_string());
    }
    let candidate = if input.len() == 6 && input.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("#{}", input)
    } else {
        input.to_string()
    };
    parse_color(&candidate).map(|_| candidate)
}

/// Walk the palette entry by entry, asking for a replacement color.
///
/// An empty answer keeps the old color and an invalid one asks again. Once
/// `input` hits EOF every remaining color is kept.
pub fn recolor<R: BufRead, W: Write>(
    palette: &Palette,
    input: &mut R,
    output: &mut W,
) -> io::Result<Palette> {
    let mut colors = palette.colors.clone();
    let mut line = String::new();

    'entries: for (i, (symbol, old)) in palette.symbols.iter().zip(&palette.colors).enumerate() {
        loop {
            write!(output, "{} [{}] {} (was {}): ", swatch(old), symbol, i, old)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break 'entries;
            }
            if line.trim().is_empty() {
                break;
            }
            match normalize(&line) {
                Some(color) => {
                    colors[i] = color;
                    break;
                }
                None => writeln!(output, "not a color: {}", line.trim())?,
            }
        }
    }

    let changed = colors.iter().zip(&palette.colors).filter(|(a, b)| a != b).count();
    info!(changed, "recolored palette");
    Ok(Palette {
        colors,
        symbols: palette.symbols.clone(),
    })
}

/// `dir/name.xpm` → `dir/name_recolored.xpm`.
pub fn recolored_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    path.with_file_name(format!("{}_recolored.xpm", stem))
}
