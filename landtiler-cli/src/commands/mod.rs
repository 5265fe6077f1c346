//! CLI command implementations.

mod common;
pub mod fetch;
pub mod plan;
pub mod regions;
pub mod render;

pub use common::GridArgs;
