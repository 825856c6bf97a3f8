//! Candidate alphabet and the index <-> string bijection
//!
//! Index `i` of length `L` is `i` written in base `N` (N = alphabet size),
//! most significant symbol first and padded with the first symbol. Every
//! index in `[0, N^L)` maps to exactly one string and back, so the space can
//! be split into plain integer ranges with no shared generator state.

use crate::error::{Result, SearchError};
use crate::params::DEFAULT_ALPHABET;
use crate::space;

/// Marks bytes that are not part of the alphabet in the reverse lookup table
const NOT_A_DIGIT: u8 = u8::MAX;

/// Ordered set of distinct printable ASCII symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    /// symbol byte -> digit value
    lookup: [u8; 128],
}

impl Alphabet {
    /// Build an alphabet, rejecting empty input, duplicates and anything
    /// outside printable ASCII
    pub fn new(symbols: &str) -> Result<Self> {
        if symbols.is_empty() {
            return Err(SearchError::EmptyAlphabet);
        }

        let mut lookup = [NOT_A_DIGIT; 128];
        let mut bytes = Vec::with_capacity(symbols.len());

        for c in symbols.chars() {
            if !c.is_ascii_graphic() {
                return Err(SearchError::InvalidSymbol(c));
            }
            let b = c as u8;
            if lookup[b as usize] != NOT_A_DIGIT {
                return Err(SearchError::DuplicateSymbol(c));
            }
            lookup[b as usize] = bytes.len() as u8;
            bytes.push(b);
        }

        Ok(Self {
            symbols: bytes,
            lookup,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn as_str(&self) -> &str {
        // Validated as ASCII in `new`
        core::str::from_utf8(&self.symbols).unwrap_or_default()
    }

    /// Number of candidates of `length` symbols
    pub fn space_size(&self, length: usize) -> Result<u128> {
        space::space_size(self.len(), length)
    }

    /// Write the candidate for `index` into `out`, using all of `out`
    ///
    /// `index` must be below `len()^out.len()`; larger indices wrap silently.
    #[inline]
    pub fn encode_into(&self, mut index: u128, out: &mut [u8]) {
        let base = self.symbols.len() as u128;
        for slot in out.iter_mut().rev() {
            *slot = self.symbols[(index % base) as usize];
            index /= base;
        }
    }

    /// Candidate string for `index` at `length`
    ///
    /// # Example
    ///
    /// ```rust
    /// use collider_core::Alphabet;
    ///
    /// let ab = Alphabet::new("ab").unwrap();
    /// assert_eq!(ab.encode(0, 3), "aaa");
    /// assert_eq!(ab.encode(6, 3), "bba");
    /// ```
    pub fn encode(&self, index: u128, length: usize) -> String {
        let mut buf = vec![0u8; length];
        self.encode_into(index, &mut buf);
        buf.into_iter().map(char::from).collect()
    }

    /// Index of `candidate` among strings of its own length
    ///
    /// Returns `None` if a symbol is not in the alphabet or the index does not
    /// fit in 128 bits.
    pub fn decode(&self, candidate: &str) -> Option<u128> {
        let base = self.symbols.len() as u128;
        candidate.bytes().try_fold(0u128, |acc, b| {
            let digit = *self.lookup.get(b as usize)?;
            if digit == NOT_A_DIGIT {
                return None;
            }
            acc.checked_mul(base)?.checked_add(digit as u128)
        })
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let symbols = DEFAULT_ALPHABET.as_bytes().to_vec();
        let mut lookup = [NOT_A_DIGIT; 128];
        for (digit, &b) in symbols.iter().enumerate() {
            lookup[b as usize] = digit as u8;
        }
        Self { symbols, lookup }
    }
}
