//! Top-level facade crate for svcmetric.
//!
//! Re-exports core contracts and the interception engine so users can depend on a single crate.

pub mod core {
    pub use svcmetric_core::*;
}

pub mod instrument {
    pub use svcmetric_instrument::*;
}
