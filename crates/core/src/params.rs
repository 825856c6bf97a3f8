//! Selector collider default parameters
//!
//! These mirror the classic "find another `xxx()` for `solve()`" setup.

/// Default alphabet: lowercase, uppercase, then digits (62 symbols)
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default target signature
pub const DEFAULT_TARGET: &str = "solve()";

/// Text prepended to every candidate
pub const DEFAULT_PREFIX: &str = "";

/// Text appended to every candidate (turns a name into a signature)
pub const DEFAULT_SUFFIX: &str = "()";

/// Shortest candidate body searched by default
pub const DEFAULT_MIN_LENGTH: usize = 1;

/// Longest candidate body searched by default
pub const DEFAULT_MAX_LENGTH: usize = 20;

/// Selector size in bytes
pub const SELECTOR_SIZE: usize = 4;

/// Keccak-256 output size
pub const KECCAK256_SIZE: usize = 32;

/// Candidates a worker hashes between flushes to the shared counter
pub const COUNTER_FLUSH_INTERVAL: u64 = 4096;
