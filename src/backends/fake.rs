//! In-memory framebuffer for exercising the session without hardware.

use crate::device::FbDevice;
use crate::geometry::{Channel, FixedGeometry, ModeGeometry};
use nix::errno::Errno;
use std::io;
use std::sync::{Arc, Mutex};

/// Shared with the test so it can inspect the device after the session owns it.
#[derive(Debug, Default)]
pub struct FakeState {
    /// Every y offset passed to `pan`, in order.
    pub pans: Vec<u32>,
    pub set_modes: usize,
    pub handle_open: bool,
    /// Contents of the region when it was handed back.
    pub unmapped: Option<Vec<u8>>,

    /// Overrides the virtual height the driver grants.
    pub grant_yres_virtual: Option<u32>,

    pub fail_query: bool,
    pub fail_set: bool,
    pub fail_fixed: bool,
    pub fail_map: bool,
    pub fail_pan: bool,
}

pub struct FakeDevice {
    mode: ModeGeometry,
    fixed: FixedGeometry,
    memory: Vec<u8>,
    state: Arc<Mutex<FakeState>>,
}

impl FakeDevice {
    /// A 32bpp device with room for exactly two buffers.
    pub fn new(xres: u32, yres: u32, line_length: usize) -> Self {
        let mem_len = 2 * yres as usize * line_length;
        let mode = ModeGeometry {
            xres,
            yres,
            xres_virtual: xres,
            yres_virtual: yres,
            bits_per_pixel: 32,
            blue: Channel { offset: 0, length: 8, msb_right: false },
            green: Channel { offset: 8, length: 8, msb_right: false },
            red: Channel { offset: 16, length: 8, msb_right: false },
            alpha: Channel { offset: 24, length: 8, msb_right: false },
            ..Default::default()
        };
        let fixed = FixedGeometry {
            id: "fake".into(),
            mem_len,
            line_length,
            ..Default::default()
        };
        let state = FakeState { handle_open: true, ..Default::default() };
        Self {
            mode,
            fixed,
            memory: vec![0; mem_len],
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Fills memory with a recognisable non-zero pattern.
    pub fn with_pattern(mut self) -> Self {
        for (i, b) in self.memory.iter_mut().enumerate() {
            *b = (i % 251) as u8 + 1;
        }
        self
    }

    pub fn with_mode(mut self, f: impl FnOnce(&mut ModeGeometry)) -> Self {
        f(&mut self.mode);
        self
    }

    pub fn with_mem_len(mut self, mem_len: usize) -> Self {
        self.fixed.mem_len = mem_len;
        self.memory.resize(mem_len, 0);
        self
    }

    pub fn state(&self) -> Arc<Mutex<FakeState>> {
        Arc::clone(&self.state)
    }

    fn check(&self, failing: impl FnOnce(&FakeState) -> bool) -> io::Result<()> {
        if failing(&*self.state.lock().unwrap()) {
            return Err(Errno::EINVAL.into());
        }
        Ok(())
    }
}

impl FbDevice for FakeDevice {
    type Region = Vec<u8>;

    fn query_mode(&mut self) -> io::Result<ModeGeometry> {
        self.check(|s| s.fail_query)?;
        Ok(self.mode.clone())
    }

    fn set_mode(&mut self, mode: &ModeGeometry) -> io::Result<()> {
        self.check(|s| s.fail_set)?;
        let mut state = self.state.lock().unwrap();
        state.set_modes += 1;
        self.mode.yres_virtual = state.grant_yres_virtual.unwrap_or(mode.yres_virtual);
        self.mode.xres_virtual = mode.xres_virtual;
        self.mode.yoffset = mode.yoffset;
        Ok(())
    }

    fn query_fixed(&mut self) -> io::Result<FixedGeometry> {
        self.check(|s| s.fail_fixed)?;
        Ok(self.fixed.clone())
    }

    fn pan(&mut self, mode: &ModeGeometry) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.pans.push(mode.yoffset);
        if state.fail_pan {
            return Err(Errno::EINVAL.into());
        }
        self.mode.yoffset = mode.yoffset;
        Ok(())
    }

    fn map(&mut self, len: usize) -> io::Result<Vec<u8>> {
        self.check(|s| s.fail_map)?;
        Ok(self.memory[..len].to_vec())
    }

    fn unmap(&mut self, region: Vec<u8>) {
        self.state.lock().unwrap().unmapped = Some(region);
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.handle_open = false;
        }
    }
}
