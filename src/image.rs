// PNG export for generated grids
// Each cell becomes one RGBA pixel; XPM's "None" becomes fully transparent

use std::path::Path;

use image::{ImageError, Rgba, RgbaImage};
use thiserror::Error;
use tracing::debug;

use crate::config::Palette;
use crate::grid::Grid;
use crate::palette::parse_color;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("palette color {index} ({color:?}) is not #RRGGBB, #RGB or None")]
    Color { index: usize, color: String },
    #[error("grid of {width}x{height} does not fit in an image")]
    TooLarge { width: usize, height: usize },
    #[error("failed to encode image: {0}")]
    Image(#[from] ImageError),
}

/// Convert a grid to RGBA pixels using the palette's colors.
pub fn to_rgba(grid: &Grid, palette: &Palette) -> Result<RgbaImage, ExportError> {
    let lut = palette
        .colors
        .iter()
        .enumerate()
        .map(|(index, color)| {
            parse_color(color).map(Rgba).ok_or_else(|| ExportError::Color {
                index,
                color: color.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let too_large = || ExportError::TooLarge {
        width: grid.width(),
        height: grid.height(),
    };
    let width = u32::try_from(grid.width()).map_err(|_| too_large())?;
    let height = u32::try_from(grid.height()).map_err(|_| too_large())?;

    let transparent = Rgba([0, 0, 0, 0]);
    Ok(RgbaImage::from_fn(width, height, |x, y| {
        let index = grid.get(x as usize, y as usize);
        lut.get(index).copied().unwrap_or(transparent)
    }))
}

/// Write the grid as a PNG at `path`.
pub fn save_png(path: &Path, grid: &Grid, palette: &Palette) -> Result<(), ExportError> {
    let img = to_rgba(grid, palette)?;
    img.save_with_format(path, image::ImageFormat::Png)?;
    debug!(path = %path.display(), "wrote png");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_follow_palette_and_transparency() {
        let palette = Palette::new(["None", "#FF8000", "#0F0"]).unwrap();
        let grid = Grid::from_cells(3, 1, vec![0, 1, 2]).unwrap();
        let img = to_rgba(&grid, &palette).unwrap();
        assert_eq!(img.dimensions(), (3, 1));
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([255, 128, 0, 255]));
        assert_eq!(img.get_pixel(2, 0), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn named_colors_are_rejected() {
        let palette = Palette::new(["#000000", "red"]).unwrap();
        let grid = Grid::new(2, 2);
        assert!(matches!(
            to_rgba(&grid, &palette),
            Err(ExportError::Color { index: 1, .. })
        ));
    }

    #[test]
    fn png_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let palette = Palette::new(["#000000", "#FFFFFF"]).unwrap();
        let grid = Grid::from_cells(2, 2, vec![0, 1, 1, 0]).unwrap();
        save_png(&path, &grid, &palette).unwrap();
        let back = ::image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.get_pixel(1, 0), &Rgba([255, 255, 255, 255]));
    }
}
