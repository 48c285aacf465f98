use crate::color::{BYTES_PER_PIXEL, Bgra, ColorModel};
use crate::geometry::Rect;

/// A clipped, pixel-addressable view over the drawable buffer.
///
/// Coordinates are absolute: a sub-surface keeps the coordinate system of its
/// parent and only narrows the rectangle that accepts reads and writes.
pub struct Surface<'a> {
    buf: &'a mut [u8],
    stride: usize,
    rect: Rect,
}

impl<'a> Surface<'a> {
    pub(crate) fn new(buf: &'a mut [u8], stride: usize, rect: Rect) -> Self {
        Self { buf, stride, rect }
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }

    pub fn color_model(&self) -> ColorModel {
        ColorModel::Bgra32
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.rect.contains(x, y) || x < 0 || y < 0 {
            return None;
        }
        let start = x as usize * BYTES_PER_PIXEL + y as usize * self.stride;
        (start + BYTES_PER_PIXEL <= self.buf.len()).then_some(start)
    }

    /// Returns [`Bgra::TRANSPARENT`] outside the bounds.
    pub fn at(&self, x: i32, y: i32) -> Bgra {
        match self.offset(x, y) {
            Some(start) => {
                let mut px = [0u8; BYTES_PER_PIXEL];
                px.copy_from_slice(&self.buf[start..start + BYTES_PER_PIXEL]);
                Bgra::from_bytes(px)
            }
            None => Bgra::TRANSPARENT,
        }
    }

    /// Writes are silently dropped outside the bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: impl Into<Bgra>) {
        let Some(start) = self.offset(x, y) else {
            return;
        };
        let px = self.color_model().convert(color).to_bytes();
        self.buf[start..start + BYTES_PER_PIXEL].copy_from_slice(&px);
    }

    /// A view over `r ∩ bounds()` sharing this buffer, or `None` when they do not overlap.
    pub fn sub_image(&mut self, r: Rect) -> Option<Surface<'_>> {
        let rect = r.intersect(&self.rect);
        if rect.is_empty() {
            return None;
        }
        Some(Surface { buf: &mut *self.buf, stride: self.stride, rect })
    }
}
