pub mod markers;
pub mod routes;
pub mod selection;
pub mod symbology;

pub use markers::*;
pub use routes::*;
pub use selection::*;
pub use symbology::*;
