//! POI and route data model shared by the sync engine, the bridge and the
//! REST client.

pub mod poi;
pub mod poi_set;
pub mod route;

pub use poi::*;
pub use poi_set::*;
pub use route::*;
