//! Host/surface bridge for the embedded map.

pub mod bridge;
pub mod command;
pub mod protocol;
pub mod surface;

pub use bridge::*;
pub use command::*;
pub use protocol::*;
pub use surface::*;
