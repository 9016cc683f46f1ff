pub mod debounce;
pub mod generation;
pub mod metrics;
pub mod notices;

pub use debounce::*;
pub use generation::*;
pub use metrics::*;
pub use notices::*;
