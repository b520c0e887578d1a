// MIT/Apache2 License

//! Pixel surfaces that live in client memory, and accelerated surfaces that keep a mirror of their pixels
//! in device memory and recover it when the system takes it away.

mod accelerated;
mod canvas;
mod error;
mod handle;

pub mod color;
pub mod intensity;
pub mod shape;
pub mod surface;
pub mod toolkit;

pub(crate) mod raster;
pub(crate) mod util;

pub use accelerated::*;
pub use canvas::*;
pub use color::*;
pub use error::*;
pub use handle::*;
pub use intensity::*;
pub use shape::*;
pub use surface::*;
pub use toolkit::*;
