/// Size of one pixel in the mapped region. Only 32bpp modes are supported.
pub const BYTES_PER_PIXEL: usize = 4;

/// A pixel in the device's native byte order: blue, green, red, alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bgra {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgra {
    pub const TRANSPARENT: Bgra = Bgra { b: 0, g: 0, r: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    pub const fn to_bytes(self) -> [u8; BYTES_PER_PIXEL] {
        [self.b, self.g, self.r, self.a]
    }

    pub const fn from_bytes(bytes: [u8; BYTES_PER_PIXEL]) -> Self {
        Self { b: bytes[0], g: bytes[1], r: bytes[2], a: bytes[3] }
    }
}

/// Device-independent color. Converting into [`Bgra`] reorders the channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for Bgra {
    fn from(c: Rgba) -> Self {
        Bgra { b: c.b, g: c.g, r: c.r, a: c.a }
    }
}

impl From<Bgra> for Rgba {
    fn from(c: Bgra) -> Self {
        Rgba { r: c.r, g: c.g, b: c.b, a: c.a }
    }
}

/// Packed `0xAARRGGBB`. Each channel keeps its low eight bits.
impl From<u32> for Bgra {
    fn from(argb: u32) -> Self {
        Bgra {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }
}

/// Opaque `(r, g, b)`.
impl From<(u8, u8, u8)> for Bgra {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Bgra::opaque(r, g, b)
    }
}

/// `[r, g, b, a]`.
impl From<[u8; 4]> for Bgra {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Bgra::new(r, g, b, a)
    }
}

/// Describes how a surface stores color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    /// 32 bits per pixel, bytes ordered B, G, R, A.
    Bgra32,
}

impl ColorModel {
    /// Converts any color into the model's native form. `Bgra` passes through unchanged.
    pub fn convert(self, color: impl Into<Bgra>) -> Bgra {
        match self {
            ColorModel::Bgra32 => color.into(),
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorModel::Bgra32 => BYTES_PER_PIXEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_byte_order() {
        let c = Bgra::new(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.to_bytes(), [0x33, 0x22, 0x11, 0x44]);
        assert_eq!(Bgra::from_bytes(c.to_bytes()), c);
    }

    #[test]
    fn test_rgba_conversion_reorders() {
        let c: Bgra = Rgba::new(1, 2, 3, 4).into();
        assert_eq!(c.to_bytes(), [3, 2, 1, 4]);
        assert_eq!(Rgba::from(c), Rgba::new(1, 2, 3, 4));
    }

    #[test]
    fn test_packed_argb() {
        let c = Bgra::from(0x80ff4010u32);
        assert_eq!(c, Bgra::new(0xff, 0x40, 0x10, 0x80));
    }

    #[test]
    fn test_identity_fast_path() {
        let c = Bgra::new(9, 8, 7, 6);
        assert_eq!(ColorModel::Bgra32.convert(c), c);
    }

    #[test]
    fn test_tuple_is_opaque() {
        assert_eq!(ColorModel::Bgra32.convert((1u8, 2u8, 3u8)).a, 0xff);
        assert_eq!(ColorModel::Bgra32.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_rgba_array() {
        assert_eq!(Bgra::from([0x10u8, 0x20, 0x30, 0x40]).to_bytes(), [0x30, 0x20, 0x10, 0x40]);
    }
}
