//! xpgen Core - Configuration model for the Crossplane composition generator
//!
//! This crate provides the foundational types used throughout xpgen:
//! - `GeneratorConfig`: the process-wide global configuration
//! - `Generator`: one per-resource configuration, resolved against the global layer
//! - `merge`: list/map merge utilities backing the `globalHandling` policies
//! - `resolve`: the three-way override/append/inherit resolution and its validation

pub mod config;
pub mod error;
pub mod merge;
pub mod resolve;

pub use config::{
    Composition, CrdConfig, GLOBAL_LABELS, Generator, GeneratorConfig, GlobalHandling,
    GlobalProviderConfig, LabelConfig, OverrideField, ProviderConfig, TagConfig,
};
pub use error::{CoreError, Result};
pub use merge::{merge_lists, merge_maps};
pub use resolve::{resolve, validate, validate_global};
