//! Conditional logging macros.
//!
//! With the `tracing` feature, `debug!` and `warn!` are the `tracing` macros.
//! Without it they expand to nothing, so advisories and parse warnings cost
//! nothing in builds that do not collect them.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
