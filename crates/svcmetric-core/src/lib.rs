//! svcmetric core: the contracts shared between the interception engine, the
//! weaving layer that installs it, and metric registries.
//!
//! This crate defines method identity and metadata, the registry/handle
//! traits, and the error surface. It carries no runtime dependencies so a
//! registry implementation can depend on it without pulling in the engine.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod method;
pub mod registry;

pub use error::{ConfigurationError, ErrorCode, InterceptError, Result, SettingsError};
pub use method::{Arg, MethodIdentity, MethodMeta, MetricMetadata};
pub use registry::{MetricHandle, MetricNode, MetricRegistry};
