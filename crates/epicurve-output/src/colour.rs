//! Stable colours from series labels.
//!
//! The label is read as a base-26 number (character code minus `'a'`, least
//! significant first), shifted by the palette offset, multiplied by the prime
//! 15485863 and reduced modulo 16^6 to an RGB triple. Everything is computed
//! modulo 16^6, so arbitrarily long labels never overflow.

use serde::{Deserialize, Serialize};
use std::fmt;

const MODULUS: i64 = 1 << 24;
const MULTIPLIER: i64 = 15_485_863;

/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour(u32);

impl Colour {
    /// Colour from a packed `0xRRGGBB` value.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Packed `0xRRGGBB` value.
    pub const fn rgb(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Deterministic colour for a label.
///
/// A pure function of `(name, offset)`. Offset 0 reproduces the base palette.
pub fn colour_from_name(name: &str, offset: i64) -> Colour {
    let mut n: i64 = 0;
    let mut weight: i64 = 1;
    for c in name.chars() {
        let digit = i64::from(u32::from(c)) - i64::from(b'a');
        n = (n + digit.rem_euclid(MODULUS) * weight).rem_euclid(MODULUS);
        weight = (weight * 26) % MODULUS;
    }

    let n = (n + offset.rem_euclid(MODULUS)).rem_euclid(MODULUS);
    let rgb = (n * MULTIPLIER).rem_euclid(MODULUS);
    Colour::from_rgb(rgb as u32)
}
