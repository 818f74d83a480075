//! Test utilities for sliced development.
//!
//! Provides deterministic fixtures for generic and type-erased containers
//! so that integration tests, FFI tests and benchmarks build their inputs
//! the same way.

pub mod fixtures;

pub use fixtures::{
    capped_config, int_slice, raw_i32_slice, raw_to_i32s, read_i32, seeded_blocks,
};
