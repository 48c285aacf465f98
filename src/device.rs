use crate::geometry::{FixedGeometry, ModeGeometry};
use std::io;
use std::ops::DerefMut;

/// Control operations a framebuffer device must offer.
///
/// One adapter exists per platform. The raw record layouts and request codes
/// stay inside the adapter; everything above it works with [`ModeGeometry`]
/// and [`FixedGeometry`].
pub trait FbDevice {
    /// The mapped pixel memory. Dropping it must release the mapping.
    type Region: DerefMut<Target = [u8]>;

    fn query_mode(&mut self) -> io::Result<ModeGeometry>;

    /// Requests a new mode. The driver may round values, so callers re-query afterwards.
    fn set_mode(&mut self, mode: &ModeGeometry) -> io::Result<()>;

    fn query_fixed(&mut self) -> io::Result<FixedGeometry>;

    /// Moves scan-out to `mode.xoffset`/`mode.yoffset`.
    fn pan(&mut self, mode: &ModeGeometry) -> io::Result<()>;

    fn map(&mut self, len: usize) -> io::Result<Self::Region>;

    fn unmap(&mut self, region: Self::Region) {
        drop(region);
    }
}
