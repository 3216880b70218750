//! # Rawbuf
//!
//! An owned contiguous buffer built directly on raw allocation primitives.
//!
//! Rawbuf provides [`Buffer`], a handle that owns exactly one heap region of
//! plain-data elements and exposes a disciplined, bounds-aware API for
//! sizing, filling, copying, comparing, and transferring ownership of that
//! region.
//!
//! ## Core Concepts
//!
//! - **Single owner**: exactly one handle owns a given region at any instant;
//!   every transfer operation empties the donor before the recipient reports
//!   ownership
//! - **Raw primitives underneath**: allocation, zeroed allocation, in-place
//!   resize, and release map straight onto the global allocator
//! - **Checked edges**: size, index, and range preconditions are validated
//!   and reported as errors rather than trusted
//! - **Explicit escape hatches**: detach-without-free and raw-storage
//!   adoption exist for ownership hand-off, clearly marked as such
//!
//! ## Example
//!
//! ```rust
//! use rawbuf::Buffer;
//!
//! // Allocate room for five integers and initialize them.
//! let mut buffer = Buffer::<u32>::with_count(5)?;
//! buffer.fill(7)?;
//!
//! let mut out = [0u32; 5];
//! buffer.read_into(&mut out)?;
//! assert_eq!(out, [7, 7, 7, 7, 7]);
//! # Ok::<(), rawbuf::BufferError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod error;

// Re-exports for convenience
pub use buffer::Buffer;
pub use error::{BufferError, BufferResult};
