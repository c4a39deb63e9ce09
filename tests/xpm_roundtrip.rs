use std::io::Cursor;

use rand::SeedableRng;
use rand::rngs::StdRng;

use xpm_synth::palette::preset_colors;
use xpm_synth::recolor::recolored_path;
use xpm_synth::{Algorithm, Config, Palette, XpmImage, generate, recolor, save_png, xpm};

#[test]
fn generated_texture_reads_back_unchanged() {
    let mut rng = StdRng::seed_from_u64(11);
    let palette = Palette::new(preset_colors(Algorithm::Cute, &mut rng)).unwrap();
    let config = Config::new(40, 30, Algorithm::Cute, palette).unwrap();
    let grid = generate(&config, &mut rng).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cute.xpm");
    xpm::write(&path, &grid, &config.palette).unwrap();

    let image = XpmImage::read(&path).unwrap();
    let (back, palette) = image.to_grid().unwrap();
    assert_eq!(back, grid);
    assert_eq!(palette, config.palette);
    assert_eq!(palette.colors[0], "None");
}

#[test]
fn recolor_session_rewrites_palette_only() {
    let mut rng = StdRng::seed_from_u64(12);
    let palette = Palette::new(preset_colors(Algorithm::Attractor, &mut rng)).unwrap();
    let config = Config::new(16, 16, Algorithm::Xor, palette).unwrap();
    let grid = generate(&config, &mut rng).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xor.xpm");
    xpm::write(&path, &grid, &config.palette).unwrap();

    let (grid_in, palette_in) = XpmImage::read(&path).unwrap().to_grid().unwrap();
    let mut answers = Cursor::new("\n00ff00\nnot-a-color\n#123\n");
    let mut transcript = Vec::new();
    let recolored = recolor(&palette_in, &mut answers, &mut transcript).unwrap();
    assert_eq!(recolored.colors[0], config.palette.colors[0]);
    assert_eq!(recolored.colors[1], "#00ff00");
    assert_eq!(recolored.colors[2], "#123");
    assert_eq!(recolored.colors[3..], config.palette.colors[3..]);

    let out = recolored_path(&path);
    xpm::write(&out, &grid_in, &recolored).unwrap();
    save_png(&out.with_extension("png"), &grid_in, &recolored).unwrap();

    let (grid_out, palette_out) = XpmImage::read(&out).unwrap().to_grid().unwrap();
    assert_eq!(grid_out, grid);
    assert_eq!(palette_out, recolored);
    assert!(dir.path().join("xor_recolored.png").exists());
}
