use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FbError {
    #[error("failed to open framebuffer device {}: {source}", path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read variable screen info: {0}")]
    ModeQuery(#[source] io::Error),

    #[error("failed to set variable screen info: {0}")]
    ModeSet(#[source] io::Error),

    #[error("failed to read fixed screen info: {0}")]
    FixedInfo(#[source] io::Error),

    #[error("failed to map framebuffer memory: {0}")]
    Map(#[source] io::Error),

    #[error("failed to pan display to y offset {offset}: {source}")]
    Pan {
        offset: u32,
        #[source]
        source: io::Error,
    },

    #[error("unsupported pixel depth: {0} bits per pixel (only 32 is supported)")]
    UnsupportedDepth(u32),

    #[error("driver granted virtual height {granted}, need {requested} for two buffers")]
    VirtualHeightRejected { requested: u32, granted: u32 },

    #[error("scanline stride {line_length} is narrower than a {row}-byte row")]
    StrideTooNarrow { line_length: usize, row: usize },

    #[error("framebuffer memory too small: need {needed} bytes, device has {available}")]
    RegionTooSmall { needed: usize, available: usize },

    #[error("framebuffer session is closed")]
    Closed,
}
