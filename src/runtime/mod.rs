//! Execution runtime for the tiled engines
//!
//! ```text
//! TiledClient
//! ├── ParallelismConfig (thread count, per-task granularity)
//! ├── optional dedicated rayon pool
//! └── fork-join helpers (for_each_index, for_each_item, sum_indices)
//! ```
//!
//! Engines never spawn threads themselves; they hand closures over tile
//! coordinates to the client, which decides where and how they run.

mod client;
mod parallel;

pub use client::{ParallelismConfig, TiledClient};
