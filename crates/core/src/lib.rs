//! # Selector Collider Engine
//!
//! Brute-force search for EVM function signatures whose 4-byte selector
//! (first 4 bytes of Keccak-256) matches a target, for example another
//! `xxx()` that dispatches like `solve()`.
//!
//! ## How the search works
//!
//! - Candidates are `prefix || body || suffix`, where the body is drawn from
//!   an ordered alphabet (62 alphanumerics by default).
//! - Bodies of length `L` are numbered `0..N^L`; index `i` is `i` written in
//!   base `N`, so the space splits into plain integer ranges.
//! - Each length is partitioned across worker threads, which all stop as soon
//!   as any of them finds a collision.
//! - Lengths are searched shortest first, one at a time.
//!
//! ## Example
//!
//! ```rust
//! use collider_core::{selector, Alphabet, SearchParams, Searcher, Target};
//!
//! // Pretend the target is whatever "ba()" hashes to
//! let target = Target::with_excluded(selector(b"ba()"), "x()");
//! let params = SearchParams::new(Alphabet::new("ab").unwrap(), target)
//!     .with_lengths(1, 3)
//!     .with_workers(2);
//!
//! let outcome = Searcher::new(params).unwrap().run(&mut ()).unwrap();
//! assert_eq!(outcome.collision().unwrap().candidate, "ba()");
//! ```

mod alphabet;
mod error;
mod params;
mod search;
mod selector;
mod space;
mod worker;

pub use alphabet::Alphabet;
pub use error::{Result, SearchError};
pub use params::*;
pub use search::{
    LengthSummary, Progress, SearchObserver, SearchOutcome, SearchParams, SearchStats, Searcher,
};
pub use selector::{selector, Selector, Target};
pub use space::{max_length, partition, space_size, Partition};
pub use worker::{scan, Collision, StopFlag, WorkerReport};

#[cfg(test)]
mod tests;
