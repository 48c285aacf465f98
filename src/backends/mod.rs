#[cfg(feature = "fbdev")]
pub mod fbdev;

#[cfg(test)]
pub mod fake;

#[cfg(feature = "fbdev")]
pub use fbdev::Fbdev;
