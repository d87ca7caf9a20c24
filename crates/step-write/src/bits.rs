//! Arbitrary-length bit strings for BINARY values.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A bit string of any length, stored most-significant bit first.
///
/// The length need not be a multiple of 4 or 8; padding is applied only when
/// the sequence is written out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSequence {
    bits: Vec<bool>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid bit character {0:?}")]
pub struct ParseBitsError(pub char);

impl BitSequence {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        Self {
            bits: bits.into_iter().collect(),
        }
    }

    /// Builds a sequence from the lowest `len` bits of `value`, highest first.
    pub fn from_uint(value: u64, len: usize) -> Self {
        let bits = (0..len)
            .rev()
            .map(|i| i < 64 && (value >> i) & 1 == 1)
            .collect();
        Self { bits }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl FromStr for BitSequence {
    type Err = ParseBitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(ParseBitsError(other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|bits| Self { bits })
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::from_bits(iter)
    }
}
