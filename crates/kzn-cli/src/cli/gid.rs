//! Display identifiers for downloads.

use rand::Rng;
use std::fmt;

const HEX: &[u8; 16] = b"0123456789abcdef";
const GID_LEN: usize = 6;

/// Six lowercase hex digits identifying a download in the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gid(String);

impl Gid {
    /// Draws a new identifier from `rng`; seeded generators give reproducible ids.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..GID_LEN)
            .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
            .collect();
        Gid(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Gid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}
