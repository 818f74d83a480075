//! Growable slice containers with negative indexing, strided sub-ranges
//! and functional combinators.
//!
//! Two containers share one set of rules:
//!
//! - [`Slice<T>`]: generic over the element type.
//! - [`RawSlice`]: type-erased, storing fixed-size byte blocks whose width
//!   is given at construction. Used by the C surface.
//!
//! # Indexing
//!
//! Indices are signed. `0..len` address elements from the front and
//! `-len..=-1` from the back (`-1` is the last element). Sub-ranges take
//! `(start, end, step)`; a negative `end` is inclusive of the element it
//! addresses, and a negative `step` walks the same range back to front.
//!
//! # Failure
//!
//! Constructive and mutating operations return `Result<_, SliceError>`.
//! Growth never panics on overflow and never aborts on allocator refusal;
//! a failed append leaves the container untouched. Bulk appends
//! ([`Slice::append_array`], [`Slice::extend`]) keep whatever they
//! appended before the failure.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
mod growth;
pub mod index;
pub mod raw;
pub mod slice;

// Public re-exports for the primary API surface.
pub use config::{ConfigError, GrowthPolicy, SliceConfig};
pub use error::SliceError;
pub use raw::RawSlice;
pub use slice::Slice;
