use crate::color::BYTES_PER_PIXEL;
use crate::device::FbDevice;
use crate::error::FbError;
use crate::geometry::{FixedGeometry, ModeGeometry, Rect};
use crate::surface::Surface;
use crate::swap::{Half, SwapController};
use log::{debug, info, warn};
use std::io::{self, Write};

#[cfg(feature = "fbdev")]
use crate::backends::Fbdev;
#[cfg(feature = "fbdev")]
use std::path::Path;

const CURSOR_HIDE: &str = "\x1b[?25l\x1b[?1c";
const CURSOR_SHOW: &str = "\x1b[?25h\x1b[?0c";

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Hide the console text cursor while the session is open.
    pub hide_cursor: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { hide_cursor: true }
    }
}

fn emit(seq: &str) {
    let mut out = io::stdout();
    if let Err(err) = out.write_all(seq.as_bytes()).and_then(|_| out.flush()) {
        debug!("could not write cursor escape: {err}");
    }
}

/// An open framebuffer in double-buffered mode.
///
/// The session owns the device handle, the mapped memory and a copy of what
/// was on screen before it opened. Drawing goes through [`Session::surface`],
/// which always targets the half that is not being scanned out.
pub struct Session<D: FbDevice> {
    device: Option<D>,
    region: Option<D::Region>,
    snapshot: Vec<u8>,
    fixed: FixedGeometry,
    mode: ModeGeometry,
    swap: SwapController,
    original_yoffset: u32,
    options: SessionOptions,
}

#[cfg(feature = "fbdev")]
impl Session<Fbdev> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FbError> {
        Self::open_with(path, SessionOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: SessionOptions) -> Result<Self, FbError> {
        Self::with_device(Fbdev::open(path)?, options)
    }
}

impl<D: FbDevice> Session<D> {
    /// Negotiates a double-height mode on `device`, maps it and shows the
    /// first buffer. On error the device is dropped, which releases its handle.
    pub fn with_device(mut device: D, options: SessionOptions) -> Result<Self, FbError> {
        let current = device.query_mode().map_err(FbError::ModeQuery)?;
        let original_yoffset = current.yoffset;

        let requested = current.yres.checked_mul(2).ok_or(FbError::VirtualHeightRejected {
            requested: u32::MAX,
            granted: current.yres_virtual,
        })?;
        let wanted = ModeGeometry { yres_virtual: requested, ..current };
        device.set_mode(&wanted).map_err(FbError::ModeSet)?;
        let mode = device.query_mode().map_err(FbError::ModeQuery)?;
        debug!("negotiated mode: {mode:?}");

        if mode.bits_per_pixel != 32 {
            return Err(FbError::UnsupportedDepth(mode.bits_per_pixel));
        }
        if mode.yres_virtual < requested {
            return Err(FbError::VirtualHeightRejected { requested, granted: mode.yres_virtual });
        }

        let fixed = device.query_fixed().map_err(FbError::FixedInfo)?;
        debug!("fixed info: {fixed:?}");
        let row = mode.xres as usize * BYTES_PER_PIXEL;
        if fixed.line_length < row {
            return Err(FbError::StrideTooNarrow { line_length: fixed.line_length, row });
        }
        let needed = (2 * mode.yres as usize).saturating_mul(fixed.line_length);
        if fixed.mem_len < needed {
            return Err(FbError::RegionTooSmall { needed, available: fixed.mem_len });
        }

        let region = device.map(fixed.mem_len).map_err(FbError::Map)?;
        let snapshot = region.to_vec();

        if options.hide_cursor {
            emit(CURSOR_HIDE);
        }
        info!(
            "framebuffer {:?} open: {}x{} stride {} ({} bytes mapped)",
            fixed.id, mode.xres, mode.yres, fixed.line_length, fixed.mem_len
        );

        let mut session = Self {
            device: Some(device),
            region: Some(region),
            snapshot,
            swap: SwapController::new(mode.yres, fixed.line_length),
            fixed,
            mode,
            original_yoffset,
            options,
        };
        if let Err(err) = session.swap() {
            warn!("initial pan failed: {err}");
        }
        Ok(session)
    }

    pub fn fixed(&self) -> &FixedGeometry {
        &self.fixed
    }

    pub fn mode(&self) -> &ModeGeometry {
        &self.mode
    }

    pub fn bounds(&self) -> Rect {
        self.mode.bounds()
    }

    pub fn visible_half(&self) -> Option<Half> {
        self.swap.visible()
    }

    pub fn drawable_half(&self) -> Half {
        self.swap.drawable()
    }

    pub fn is_closed(&self) -> bool {
        self.device.is_none()
    }

    /// Shows the buffer that was being drawn and starts drawing into the other.
    ///
    /// A failed pan is reported but the halves are still exchanged, so drawing
    /// keeps targeting the buffer that is not meant to be visible.
    pub fn swap(&mut self) -> Result<(), FbError> {
        let device = self.device.as_mut().ok_or(FbError::Closed)?;
        let visible = self.swap.advance();
        self.mode.yoffset = visible.y_offset(self.mode.yres);
        device
            .pan(&self.mode)
            .map_err(|source| FbError::Pan { offset: self.mode.yoffset, source })
    }

    /// Zeroes the drawable half. The visible half is left alone.
    pub fn clear(&mut self) {
        let range = self.swap.drawable_range();
        if let Some(bytes) = self.region.as_deref_mut().and_then(|r| r.get_mut(range)) {
            bytes.fill(0);
        }
    }

    /// The drawable half as a pixel surface. Empty once the session is closed.
    pub fn surface(&mut self) -> Surface<'_> {
        let stride = self.fixed.line_length;
        let bounds = self.bounds();
        let range = self.swap.drawable_range();
        match self.region.as_deref_mut().and_then(|r| r.get_mut(range)) {
            Some(buf) => Surface::new(buf, stride, bounds),
            None => Surface::new(&mut [], stride, Rect::default()),
        }
    }

    /// Restores the pan offset and screen contents from before the session
    /// opened, then releases the mapping and the device. Later calls do nothing.
    pub fn close(&mut self) {
        if self.device.is_none() {
            return;
        }
        if self.swap.visible_offset() != Some(self.original_yoffset) {
            if let Err(err) = self.restore_pan() {
                warn!("could not restore pan offset: {err}");
            }
        }
        if let Some(mut region) = self.region.take() {
            region.copy_from_slice(&self.snapshot);
            if let Some(device) = self.device.as_mut() {
                device.unmap(region);
            }
        }
        self.device = None;
        if self.options.hide_cursor {
            emit(CURSOR_SHOW);
        }
        info!("framebuffer {:?} closed", self.fixed.id);
    }

    fn restore_pan(&mut self) -> Result<(), FbError> {
        if self.original_yoffset == 0 || self.original_yoffset == self.mode.yres {
            return self.swap();
        }
        let device = self.device.as_mut().ok_or(FbError::Closed)?;
        self.mode.yoffset = self.original_yoffset;
        device
            .pan(&self.mode)
            .map_err(|source| FbError::Pan { offset: self.original_yoffset, source })
    }
}

impl<D: FbDevice> Drop for Session<D> {
    fn drop(&mut self) {
        self.close();
    }
}
