//! Palette presets per algorithm and color string helpers.

use rand::Rng;

use crate::config::Algorithm;
use crate::math::hsv_to_hex;

/// XPM's transparent color.
pub const TRANSPARENT: &str = "None";

const NEON: [&str; 6] = ["#000000", "#39FF14", "#FF69B4", "#00FFFF", "#FFFF00", "#BF00FF"];
const CREATURE: [&str; 6] = ["#000000", "#2b0000", "#660000", "#4a4a4a", "#e0e0e0", "#ffea00"];
const PASTEL: [&str; 6] = ["#89CFF0", "#E6E6FA", "#98FF98", "#FFD1DC", "#FFDAB9", "#FFFDD0"];
const ATTRACTOR: [&str; 6] = ["#000000", "#111122", "#004488", "#0088CC", "#00FFFF", "#FFFFFF"];
const CORAL: [&str; 14] = [
    "#000000", "#000033", "#000066", "#000099", "#0000CC", "#0000FF", "#0055FF", "#00AAFF",
    "#00FFFF", "#55FFFF", "#AAFFFF", "#FFFFFF", "#FF00FF", "#FF55FF",
];
const BUNNIES: [[&str; 3]; 4] = [
    [TRANSPARENT, "#FFFFFF", "#FF69B4"],
    [TRANSPARENT, "#FFC0CB", "#000000"],
    [TRANSPARENT, "#D2B48C", "#5C4033"],
    [TRANSPARENT, "#E6E6FA", "#4B0082"],
];

fn owned(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

/// The colors a run of `algorithm` uses unless the caller overrides them.
pub fn preset_colors<R: Rng + ?Sized>(algorithm: Algorithm, rng: &mut R) -> Vec<String> {
    match algorithm {
        Algorithm::Creature => owned(&CREATURE),
        Algorithm::Pastel => owned(&PASTEL),
        Algorithm::Attractor => owned(&ATTRACTOR),
        Algorithm::Coral => owned(&CORAL),
        Algorithm::Cute => cute_harmony(rng),
        Algorithm::CuteBunny => owned(&BUNNIES[rng.gen_range(0..BUNNIES.len())]),
        Algorithm::Physarum => neon_ramp(rng),
        _ => owned(&NEON),
    }
}

/// Transparent background, pastel body and a complementary, punchy eye color.
fn cute_harmony<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let base_hue = rng.gen_range(0..360) as f64;
    let body = hsv_to_hex(base_hue, 50.0, 95.0);
    let eyes = hsv_to_hex((base_hue + 180.0) % 360.0, 80.0, 50.0);
    vec![TRANSPARENT.to_string(), body, eyes]
}

/// Black, then 15 steps brightening and drifting 30° in hue, topped with white.
fn neon_ramp<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let base_hue = rng.gen_range(0.0..360.0);
    let mut colors = vec!["#000000".to_string()];
    for i in 1..16 {
        let t = i as f64 / 15.0;
        let hue = (base_hue + t * 30.0) % 360.0;
        let (s, v) = if i > 13 { (0.0, 100.0) } else { (100.0 - t * 20.0, 30.0 + t * 70.0) };
        colors.push(hsv_to_hex(hue, s, v));
    }
    colors
}

pub fn random_colors<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<String> {
    (0..n)
        .map(|_| {
            let [r, g, b]: [u8; 3] = rng.r#gen();
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        })
        .collect()
}

/// Parse `#RRGGBB`, `#RGB` or `None` into RGBA. Anything else is `None`.
pub fn parse_color(color: &str) -> Option<[u8; 4]> {
    let color = color.trim();
    if color.eq_ignore_ascii_case(TRANSPARENT) {
        return Some([0, 0, 0, 0]);
    }
    let hex = color.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some([channel(0)?, channel(2)?, channel(4)?, 255])
        }
        3 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some([channel(0)?, channel(1)?, channel(2)?, 255])
        }
        _ => None,
    }
}

/// A six-cell ANSI truecolor swatch, or an empty string for colors a terminal
/// cannot show (transparent or unparseable).
pub fn swatch(color: &str) -> String {
    match parse_color(color) {
        Some([r, g, b, 255]) => format!("\x1b[48;2;{};{};{}m      \x1b[0m", r, g, b),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn physarum_ramp_runs_black_to_white() {
        let mut rng = StdRng::seed_from_u64(3);
        let colors = preset_colors(Algorithm::Physarum, &mut rng);
        assert_eq!(colors.len(), 16);
        assert_eq!(colors[0], "#000000");
        assert_eq!(colors[14], "#FFFFFF");
        assert_eq!(colors[15], "#FFFFFF");
    }

    #[test]
    fn presets_satisfy_minimum_palette_sizes() {
        let mut rng = StdRng::seed_from_u64(11);
        for algo in Algorithm::ALL {
            let colors = preset_colors(algo, &mut rng);
            assert!(colors.len() >= algo.min_palette_len(), "{algo}");
            assert!(colors.iter().all(|c| parse_color(c).is_some()), "{algo}: {colors:?}");
        }
    }

    #[test]
    fn cute_background_is_transparent() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(preset_colors(Algorithm::Cute, &mut rng)[0], TRANSPARENT);
    }

    #[test]
    fn parses_hex_and_transparent() {
        assert_eq!(parse_color("#FF8000"), Some([255, 128, 0, 255]));
        assert_eq!(parse_color("#f80"), Some([255, 136, 0, 255]));
        assert_eq!(parse_color("None"), Some([0, 0, 0, 0]));
        assert_eq!(parse_color("FF8000"), None);
        assert_eq!(parse_color("#GG0000"), None);
    }

    #[test]
    fn swatch_skips_transparent() {
        assert!(swatch("None").is_empty());
        assert!(swatch("#010203").contains("48;2;1;2;3m"));
    }
}
