/// Viewport size in physical pixels.
///
/// Stored as floats so the aspect ratio can be derived without casts; the
/// render output receives the rounded integer extent.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_extent(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// `width / height`. Only meaningful for a valid viewport.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        self.width / self.height
    }

    /// Integer output extent, rounded to the nearest pixel.
    #[inline]
    pub fn extent(self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_full_hd() {
        let vp = Viewport::from_extent(1920, 1080);
        assert!((vp.aspect_ratio() - 1.777_777_8).abs() < 1e-6);
        assert_eq!(vp.extent(), (1920, 1080));
    }

    #[test]
    fn zero_and_negative_sizes_are_invalid() {
        assert!(!Viewport::new(0.0, 600.0).is_valid());
        assert!(!Viewport::new(800.0, 0.0).is_valid());
        assert!(!Viewport::new(-1.0, 600.0).is_valid());
        assert!(!Viewport::new(f32::INFINITY, 600.0).is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
