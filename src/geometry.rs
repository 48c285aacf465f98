/// Bit position of one color channel inside a pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Channel {
    pub offset: u32,
    pub length: u32,
    pub msb_right: bool,
}

/// Hardware properties reported once per session. Never changes after open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedGeometry {
    pub id: String,
    pub mem_start: u64,
    pub mem_len: usize,
    /// Bytes between the starts of two scanlines. May exceed `xres * 4`.
    pub line_length: usize,
    pub mmio_start: u64,
    pub mmio_len: usize,
}

/// The active video mode as last reported by the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeGeometry {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
    pub alpha: Channel,
}

impl ModeGeometry {
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.xres as i32, self.yres as i32)
    }
}

/// Half-open rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> i32 {
        (self.x1 - self.x0).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y1 - self.y0).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x0 <= x && x < self.x1 && self.y0 <= y && y < self.y1
    }

    /// Largest rectangle inside both. Empty intersections collapse to `Rect::default()`.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if r.is_empty() { Rect::default() } else { r }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_partial_overlap() {
        let a = Rect::new(0, 0, 100, 50);
        let b = Rect::new(80, -10, 120, 20);
        assert_eq!(a.intersect(&b), Rect::new(80, 0, 100, 20));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 20, 10);
        let r = a.intersect(&b);
        assert!(r.is_empty());
        assert_eq!(r, Rect::default());
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(0, 0, 4, 3);
        assert!(r.contains(0, 0));
        assert!(r.contains(3, 2));
        assert!(!r.contains(4, 0));
        assert!(!r.contains(0, 3));
        assert!(!r.contains(-1, 1));
    }

    #[test]
    fn test_mode_bounds() {
        let mode = ModeGeometry { xres: 800, yres: 480, ..Default::default() };
        assert_eq!(mode.bounds(), Rect::new(0, 0, 800, 480));
        assert_eq!(mode.bounds().width(), 800);
        assert_eq!(mode.bounds().height(), 480);
    }
}
