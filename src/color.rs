/// 8-bit sRGB triple.
pub type Rgb = (u8, u8, u8);

/// Hue in degrees, saturation and lightness in percent, like CSS `hsl()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let s = self.s / 100.0;
        let l = self.l / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = self.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());

        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let m = l - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_u8(r), to_u8(g), to_u8(b))
    }
}

/// Parses `RRGGBB`, with or without a leading `#`.
pub fn parse_hex(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_rgb(), (255, 0, 0));
        assert_eq!(Hsl::new(120.0, 100.0, 50.0).to_rgb(), (0, 255, 0));
        assert_eq!(Hsl::new(240.0, 100.0, 50.0).to_rgb(), (0, 0, 255));
    }

    #[test]
    fn lightness_extremes() {
        assert_eq!(Hsl::new(200.0, 100.0, 100.0).to_rgb(), (255, 255, 255));
        assert_eq!(Hsl::new(200.0, 100.0, 0.0).to_rgb(), (0, 0, 0));
        assert_eq!(Hsl::new(42.0, 0.0, 50.0).to_rgb(), (128, 128, 128));
    }

    #[test]
    fn negative_hue_wraps() {
        let a = Hsl::new(-20.0, 100.0, 70.0);
        assert_eq!(a.h, 340.0);
        assert_eq!(a.to_rgb(), Hsl::new(340.0, 100.0, 70.0).to_rgb());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex("1a1b26"), Some((0x1a, 0x1b, 0x26)));
        assert_eq!(parse_hex("#FFFFFF"), Some((255, 255, 255)));
        assert_eq!(parse_hex("fff"), None);
        assert_eq!(parse_hex("zz0000"), None);
        assert_eq!(parse_hex("ééé"), None);
    }
}
