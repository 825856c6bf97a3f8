//! Selector Collider
//!
//! Finds EVM function signatures whose 4-byte selector collides with a
//! target signature's, by brute force over a fixed alphabet.
//!
//! # Overview
//!
//! The search engine lives in [`engine`] (the `collider-core` crate). This
//! crate adds the configuration layer and result reporting used by the
//! `collider` binary.
//!
//! # Example
//!
//! ```rust
//! use collider::config::Config;
//! use collider::Searcher;
//!
//! let config = Config {
//!     alphabet: "ab".to_string(),
//!     max_length: 3,
//!     threads: Some(2),
//!     ..Config::default()
//! };
//!
//! let outcome = Searcher::new(config.to_params().unwrap())
//!     .unwrap()
//!     .run(&mut ())
//!     .unwrap();
//! assert!(!outcome.is_found());
//! ```

// Re-export the engine
pub use collider_core as engine;

pub mod config;
pub mod report;

// Convenience re-exports
pub use engine::{selector, SearchOutcome, SearchParams, Searcher, Selector, Target};
