/// Opaque linear RGB color.
///
/// Constructed from sRGB hex literals (`0x444444`) and converted to linear on
/// the way in, so it can be written straight into an sRGB surface.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::linear(0.0, 0.0, 0.0);

    #[inline]
    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a `0xRRGGBB` sRGB literal.
    pub fn from_hex(rgb: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((rgb >> shift) & 0xff) as f32 / 255.0);
        Self::linear(channel(16), channel(8), channel(0))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_extremes() {
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
        let white = Color::from_hex(0xffffff);
        assert!((white.r - 1.0).abs() < 1e-6);
        assert!((white.g - 1.0).abs() < 1e-6);
        assert!((white.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn hex_channels_are_ordered_rgb() {
        let red = Color::from_hex(0xff0000);
        assert!(red.r > 0.99 && red.g == 0.0 && red.b == 0.0);
        let blue = Color::from_hex(0x0000ff);
        assert!(blue.b > 0.99 && blue.r == 0.0);
    }

    #[test]
    fn mid_grey_is_linearized() {
        // sRGB 0x88 ≈ 0.533 → linear ≈ 0.246
        let grey = Color::from_hex(0x888888);
        assert!((grey.r - 0.246).abs() < 0.002);
    }
}
