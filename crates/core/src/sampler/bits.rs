//! Sampled bit-vectors of any width.
//!
//! A [`SignalBits`] is the raw vector a generic DUT exposes on one edge, bit 0
//! least significant. Traces and Python callers may hand it over as:
//!
//! 1. **Integer:** a JSON number up to 64 bits wide.
//! 2. **Hex string:** `"0x1f..."`, any width.
//! 3. **Binary string:** `"0b0101"` or bare `"0101"`, most significant bit
//!    first (the form a simulator prints a logic vector in). Unresolved `x`/`z`
//!    bits read low.
//! 4. **Bool array:** `[true, false, ...]`, bit 0 first.
//!
//! It serializes back as a hex string.

use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::SamplerError;

/// One sampled vector, bit 0 least significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalBits(BitVec<u64, Lsb0>);

impl SignalBits {
    /// An empty vector; every bit reads low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vector from 64-bit words, least significant word first.
    pub fn from_words(words: impl IntoIterator<Item = u64>) -> Self {
        Self(BitVec::from_vec(words.into_iter().collect()))
    }

    /// Builds a vector from little-endian bytes.
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        Self(bytes.view_bits::<Lsb0>().iter().by_vals().collect())
    }

    /// Builds a vector from individual bits, bit 0 first.
    pub fn from_bools(bits: impl IntoIterator<Item = bool>) -> Self {
        Self(bits.into_iter().collect())
    }

    /// Number of stored bits. Bits past the end read low.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no bit is stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Level of bit `index`.
    pub fn bit(&self, index: usize) -> bool {
        self.0.get(index).is_some_and(|b| *b)
    }

    /// Drives bit `index`, growing the vector as needed.
    pub fn set(&mut self, index: usize, high: bool) {
        if index >= self.0.len() {
            if !high {
                return;
            }
            self.0.resize(index + 1, false);
        }
        self.0.set(index, high);
    }

    /// High bits among the low `width` bits.
    pub fn count_ones_below(&self, width: usize) -> usize {
        self.0[..width.min(self.0.len())].count_ones()
    }

    /// Total high bits.
    pub fn count_ones(&self) -> usize {
        self.0.count_ones()
    }

    fn from_hex_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() {
            return None;
        }
        let mut bits = BitVec::with_capacity(digits.len() * 4);
        for c in digits.chars().rev() {
            let nibble = c.to_digit(16)?;
            bits.extend((0..4).map(|i| (nibble >> i) & 1 == 1));
        }
        Some(Self(bits))
    }

    fn from_binary_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() {
            return None;
        }
        digits
            .chars()
            .rev()
            .map(|c| match c {
                '1' => Some(true),
                '0' | 'x' | 'X' | 'z' | 'Z' => Some(false),
                _ => None,
            })
            .collect::<Option<BitVec<u64, Lsb0>>>()
            .map(Self)
    }
}

impl From<u64> for SignalBits {
    fn from(word: u64) -> Self {
        Self::from_words([word])
    }
}

impl FromStr for SignalBits {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|&c| c != '_').collect();
        let parsed = if let Some(hex) = cleaned
            .strip_prefix("0x")
            .or_else(|| cleaned.strip_prefix("0X"))
        {
            Self::from_hex_digits(hex)
        } else if let Some(bin) = cleaned.strip_prefix("0b") {
            Self::from_binary_digits(bin)
        } else {
            Self::from_binary_digits(&cleaned)
        };
        parsed.ok_or_else(|| SamplerError::MalformedBits(s.to_owned()))
    }
}

impl fmt::LowerHex for SignalBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        let nibbles = self.0.last_one().map_or(1, |top| top / 4 + 1);
        for n in (0..nibbles).rev() {
            let digit = (0..4).fold(0u32, |acc, i| acc | (u32::from(self.bit(n * 4 + i)) << i));
            write!(f, "{digit:x}")?;
        }
        Ok(())
    }
}

impl Serialize for SignalBits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{self:#x}"))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BitsRepr {
    Word(u64),
    Text(String),
    Bools(Vec<bool>),
}

impl<'de> Deserialize<'de> for SignalBits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match BitsRepr::deserialize(deserializer)? {
            BitsRepr::Word(word) => Ok(Self::from(word)),
            BitsRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
            BitsRepr::Bools(bits) => Ok(Self::from_bools(bits)),
        }
    }
}
