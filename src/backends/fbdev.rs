use crate::device::FbDevice;
use crate::error::FbError;
use crate::geometry::{Channel, FixedGeometry, ModeGeometry};
use memmap::{MmapMut, MmapOptions};
use nix::libc::c_ulong;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::path::Path;

const FBIOGET_VSCREENINFO: u32 = 0x4600;
const FBIOPUT_VSCREENINFO: u32 = 0x4601;
const FBIOGET_FSCREENINFO: u32 = 0x4602;
const FBIOPAN_DISPLAY: u32 = 0x4606;

#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

#[allow(dead_code)]
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
struct FbVarScreenInfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

#[allow(dead_code)]
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
struct FbFixScreenInfo {
    id: [u8; 16],
    smem_start: c_ulong,
    smem_len: u32,
    type_: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

// The kernel rejects or overruns records of the wrong size.
const _: () = assert!(size_of::<FbVarScreenInfo>() == 160);
#[cfg(target_pointer_width = "64")]
const _: () = assert!(size_of::<FbFixScreenInfo>() == 80);
#[cfg(target_pointer_width = "32")]
const _: () = assert!(size_of::<FbFixScreenInfo>() == 68);

mod ioctl {
    use super::*;

    nix::ioctl_read_bad!(get_var_screen_info, FBIOGET_VSCREENINFO, FbVarScreenInfo);
    nix::ioctl_readwrite_bad!(put_var_screen_info, FBIOPUT_VSCREENINFO, FbVarScreenInfo);
    nix::ioctl_read_bad!(get_fix_screen_info, FBIOGET_FSCREENINFO, FbFixScreenInfo);
    nix::ioctl_readwrite_bad!(pan_display, FBIOPAN_DISPLAY, FbVarScreenInfo);
}

// Copies the fields the session negotiates into the raw record.
fn apply(var: &mut FbVarScreenInfo, mode: &ModeGeometry) {
    var.xres_virtual = mode.xres_virtual;
    var.yres_virtual = mode.yres_virtual;
    var.xoffset = mode.xoffset;
    var.yoffset = mode.yoffset;
}

impl From<FbBitfield> for Channel {
    fn from(b: FbBitfield) -> Self {
        Channel { offset: b.offset, length: b.length, msb_right: b.msb_right != 0 }
    }
}

impl From<&FbVarScreenInfo> for ModeGeometry {
    fn from(v: &FbVarScreenInfo) -> Self {
        ModeGeometry {
            xres: v.xres,
            yres: v.yres,
            xres_virtual: v.xres_virtual,
            yres_virtual: v.yres_virtual,
            xoffset: v.xoffset,
            yoffset: v.yoffset,
            bits_per_pixel: v.bits_per_pixel,
            red: v.red.into(),
            green: v.green.into(),
            blue: v.blue.into(),
            alpha: v.transp.into(),
        }
    }
}

impl From<&FbFixScreenInfo> for FixedGeometry {
    fn from(f: &FbFixScreenInfo) -> Self {
        let id_len = f.id.iter().position(|&b| b == 0).unwrap_or(f.id.len());
        FixedGeometry {
            id: String::from_utf8_lossy(&f.id[..id_len]).into_owned(),
            mem_start: f.smem_start as u64,
            mem_len: f.smem_len as usize,
            line_length: f.line_length as usize,
            mmio_start: f.mmio_start as u64,
            mmio_len: f.mmio_len as usize,
        }
    }
}

/// A Linux fbdev character device such as `/dev/fb0`.
pub struct Fbdev {
    file: File,
    // Last record seen from the driver. Fields outside ModeGeometry are sent back untouched.
    var: FbVarScreenInfo,
}

impl Fbdev {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FbError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| FbError::DeviceOpen { path: path.to_path_buf(), source })?;
        Ok(Self { file, var: FbVarScreenInfo::default() })
    }
}

impl FbDevice for Fbdev {
    type Region = MmapMut;

    fn query_mode(&mut self) -> io::Result<ModeGeometry> {
        unsafe { ioctl::get_var_screen_info(self.file.as_raw_fd(), &mut self.var) }?;
        Ok(ModeGeometry::from(&self.var))
    }

    fn set_mode(&mut self, mode: &ModeGeometry) -> io::Result<()> {
        apply(&mut self.var, mode);
        unsafe { ioctl::put_var_screen_info(self.file.as_raw_fd(), &mut self.var) }?;
        Ok(())
    }

    fn query_fixed(&mut self) -> io::Result<FixedGeometry> {
        let mut fix = FbFixScreenInfo::default();
        unsafe { ioctl::get_fix_screen_info(self.file.as_raw_fd(), &mut fix) }?;
        Ok(FixedGeometry::from(&fix))
    }

    fn pan(&mut self, mode: &ModeGeometry) -> io::Result<()> {
        apply(&mut self.var, mode);
        unsafe { ioctl::pan_display(self.file.as_raw_fd(), &mut self.var) }?;
        Ok(())
    }

    fn map(&mut self, len: usize) -> io::Result<MmapMut> {
        unsafe { MmapOptions::new().len(len).map_mut(&self.file) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_id_stops_at_nul() {
        let mut fix = FbFixScreenInfo::default();
        fix.id[..7].copy_from_slice(b"simple\0");
        fix.smem_len = 4096;
        fix.line_length = 64;
        let fixed = FixedGeometry::from(&fix);
        assert_eq!(fixed.id, "simple");
        assert_eq!(fixed.mem_len, 4096);
        assert_eq!(fixed.line_length, 64);
    }

    #[test]
    fn test_apply_keeps_timings() {
        let mut var = FbVarScreenInfo {
            xres: 800,
            yres: 480,
            pixclock: 39721,
            transp: FbBitfield { offset: 24, length: 8, msb_right: 0 },
            ..Default::default()
        };
        let mut mode = ModeGeometry::from(&var);
        mode.yres_virtual = 960;
        mode.yoffset = 480;
        apply(&mut var, &mode);
        assert_eq!(var.pixclock, 39721);
        assert_eq!(var.yres_virtual, 960);
        assert_eq!(var.yoffset, 480);
        assert_eq!(ModeGeometry::from(&var).alpha.offset, 24);
    }
}
