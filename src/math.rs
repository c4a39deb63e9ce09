#[derive(Clone, Copy, Debug, PartialEq)]
pub struct C {
    pub re: f64,
    pub im: f64,
}

impl C {
    pub fn new(re: f64, im: f64) -> Self {
        C { re, im }
    }

    pub fn abs_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn add(&self, other: C) -> C {
        C::new(self.re + other.re, self.im + other.im)
    }

    pub fn mul(&self, other: C) -> C {
        C::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re
        )
    }
}

/// Convert HSV (hue in degrees, saturation and value in percent) to `#RRGGBB`.
pub fn hsv_to_hex(h: f64, s: f64, v: f64) -> String {
    let s = s / 100.0;
    let v = v / 100.0;
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if (0.0..60.0).contains(&h) => (c, x, 0.0),
        h if (60.0..120.0).contains(&h) => (x, c, 0.0),
        h if (120.0..180.0).contains(&h) => (0.0, c, x),
        h if (180.0..240.0).contains(&h) => (0.0, x, c),
        h if (240.0..300.0).contains(&h) => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |u: f64| ((u + m) * 255.0) as u8;
    format!("#{:02X}{:02X}{:02X}", channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_of_i_is_minus_one() {
        let i = C::new(0.0, 1.0);
        assert_eq!(i.mul(i), C::new(-1.0, 0.0));
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_hex(0.0, 100.0, 100.0), "#FF0000");
        assert_eq!(hsv_to_hex(120.0, 100.0, 100.0), "#00FF00");
        assert_eq!(hsv_to_hex(240.0, 100.0, 100.0), "#0000FF");
        assert_eq!(hsv_to_hex(77.0, 0.0, 100.0), "#FFFFFF");
    }
}
