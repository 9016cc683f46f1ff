pub mod area;
pub mod bounds;
pub mod coords;
pub mod geodesy;
pub mod viewport;

// Foundation crate: small, well-tested geographic primitives only.
pub use area::*;
pub use bounds::*;
pub use coords::*;
pub use geodesy::*;
pub use viewport::*;
