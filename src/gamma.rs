//! Perceptual gamma correction for the PWM outputs.

use crate::Error;

/// A 256-entry lookup table mapping linear brightness to a gamma-corrected
/// PWM value.
///
/// Tables are immutable once constructed. [`GammaTable::default`] is the
/// curve shipped with the chip's reference driver, `floor(255^((i-1)/255))`;
/// channels that need a different response can install their own table via
/// [`crate::Sn3218::set_channel_gamma`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GammaTable([u8; 256]);

impl GammaTable {
    /// Builds a table from exactly 256 entries.
    pub const fn new(table: [u8; 256]) -> Self {
        GammaTable(table)
    }

    /// Builds a table from a slice, failing with [`Error::InvalidTable`]
    /// unless it holds exactly 256 entries.
    pub fn from_slice<E>(table: &[u8]) -> Result<Self, Error<E>> {
        if table.len() != 256 {
            return Err(Error::InvalidTable);
        }
        let mut entries = [0u8; 256];
        entries.copy_from_slice(table);
        Ok(GammaTable(entries))
    }

    /// Maps a linear brightness value through the table.
    pub const fn correct(&self, linear: u8) -> u8 {
        self.0[linear as usize]
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        DEFAULT
    }
}

pub(crate) const DEFAULT: GammaTable = GammaTable::new(DEFAULT_CURVE);

// floor(255^((i - 1) / 255)) for i in 0..256, matching the reference driver.
#[rustfmt::skip]
const DEFAULT_CURVE: [u8; 256] = [
    0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
    3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5,
    5, 5, 5, 5, 6, 6, 6, 6, 6, 6, 6, 7, 7, 7, 7, 7,
    7, 8, 8, 8, 8, 8, 8, 9, 9, 9, 9, 10, 10, 10, 10, 10,
    11, 11, 11, 11, 12, 12, 12, 12, 13, 13, 13, 14, 14, 14, 15, 15,
    15, 16, 16, 16, 17, 17, 17, 18, 18, 19, 19, 20, 20, 20, 21, 21,
    22, 22, 23, 23, 24, 24, 25, 26, 26, 27, 27, 28, 29, 29, 30, 30,
    31, 32, 33, 33, 34, 35, 36, 36, 37, 38, 39, 40, 41, 41, 42, 43,
    44, 45, 46, 47, 48, 49, 51, 52, 53, 54, 55, 56, 58, 59, 60, 62,
    63, 64, 66, 67, 69, 70, 72, 73, 75, 77, 78, 80, 82, 84, 86, 87,
    89, 91, 93, 95, 98, 100, 102, 104, 106, 109, 111, 114, 116, 119, 121, 124,
    127, 130, 132, 135, 138, 141, 144, 148, 151, 154, 158, 161, 165, 168, 172, 176,
    180, 184, 188, 192, 196, 200, 205, 209, 214, 219, 223, 228, 233, 238, 244, 249,
];
