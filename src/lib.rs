//! Tear-free drawing on Linux framebuffer devices.
//!
//! A [`Session`] doubles the virtual height of the display mode, maps both
//! buffers and pans between them on [`Session::swap`]. Pixels are written
//! through a [`Surface`] over whichever half is currently off screen.

pub mod backends;
pub mod color;
pub mod device;
pub mod error;
pub mod geometry;
pub mod session;
pub mod surface;
pub mod swap;

pub use color::{Bgra, ColorModel, Rgba};
pub use device::FbDevice;
pub use error::FbError;
pub use geometry::{Channel, FixedGeometry, ModeGeometry, Rect};
pub use session::{Session, SessionOptions};
pub use surface::Surface;
pub use swap::Half;
